use database::entities::customers;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriberResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub newsletter: bool,
}

impl From<customers::Model> for SubscriberResponse {
    fn from(customer: customers::Model) -> Self {
        Self {
            id: customer.id.to_string(),
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            newsletter: customer.newsletter,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewsletterResponse {
    pub success: bool,
    pub message: String,
    pub customer: SubscriberResponse,
}
