use crate::{
    entities::customers,
    error::{BookingError, is_unique_violation},
};
use log::{debug, info};
use models::{contact::Email, request::NewsletterSignup};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};
use uuid::Uuid;

/// Name given to newsletter subscribers who did not supply one
pub const GUEST_NAME: &str = "Guest";

/// Why a customer is being resolved, which decides how an existing record changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Opt the customer into the newsletter and refresh their name
    Newsletter,
    /// Leave an existing customer untouched
    Reservation,
}

/// Identity details used to find or create a customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProfile {
    pub email: Email,
    pub name: Option<String>,
    pub phone: Option<String>,
}

pub struct CustomerService;

impl CustomerService {
    pub async fn find_by_email<C: ConnectionTrait>(
        db: &C,
        email: &Email,
    ) -> Result<Option<customers::Model>, DbErr> {
        customers::Entity::find()
            .filter(customers::Column::Email.eq(email.as_str()))
            .one(db)
            .await
    }

    /// Finds the customer behind `profile.email`, creating one if unseen
    ///
    /// # Arguments
    /// * `db` - Connection or transaction to run on
    /// * `profile` - Validated identity details
    /// * `mode` - How an existing customer is updated
    ///
    /// # Returns
    /// The stored customer. Concurrent calls for the same email converge on a
    /// single row: losing the insert race falls back to updating the winner.
    pub async fn resolve<C: ConnectionTrait>(
        db: &C,
        profile: &CustomerProfile,
        mode: ResolveMode,
    ) -> Result<customers::Model, DbErr> {
        if let Some(existing) = Self::find_by_email(db, &profile.email).await? {
            return Self::apply(db, existing, profile, mode).await;
        }

        let customer = customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(profile.name.clone().unwrap_or_else(|| GUEST_NAME.to_string())),
            email: Set(profile.email.to_string()),
            phone: Set(profile.phone.clone()),
            newsletter: Set(mode == ResolveMode::Newsletter),
        };

        match customer.insert(db).await {
            Ok(created) => {
                info!("Created customer {} <{}>", created.id, created.email);
                Ok(created)
            }
            Err(err) if is_unique_violation(&err) => {
                debug!("Lost insert race for {}, updating instead", profile.email);
                let existing = Self::find_by_email(db, &profile.email)
                    .await?
                    .ok_or(err)?;
                Self::apply(db, existing, profile, mode).await
            }
            Err(err) => Err(err),
        }
    }

    /// Validates a newsletter signup and opts the customer in
    pub async fn subscribe<C: ConnectionTrait>(
        db: &C,
        signup: &NewsletterSignup,
    ) -> Result<customers::Model, BookingError> {
        let signup = signup.validate()?;
        let profile = CustomerProfile {
            email: signup.email,
            name: signup.name,
            phone: None,
        };

        Ok(Self::resolve(db, &profile, ResolveMode::Newsletter).await?)
    }

    /// Applies `mode` to a customer that already exists
    async fn apply<C: ConnectionTrait>(
        db: &C,
        existing: customers::Model,
        profile: &CustomerProfile,
        mode: ResolveMode,
    ) -> Result<customers::Model, DbErr> {
        if mode == ResolveMode::Reservation {
            return Ok(existing);
        }

        let new_name = profile
            .name
            .as_ref()
            .filter(|name| **name != existing.name)
            .cloned();

        if existing.newsletter && new_name.is_none() {
            return Ok(existing);
        }

        let mut customer = existing.into_active_model();
        customer.newsletter = Set(true);
        if let Some(name) = new_name {
            customer.name = Set(name);
        }

        customer.update(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_db;
    use sea_orm::PaginatorTrait;
    use std::{str::FromStr, sync::Arc};

    fn profile(email: &str, name: Option<&str>) -> CustomerProfile {
        CustomerProfile {
            email: Email::from_str(email).unwrap(),
            name: name.map(str::to_string),
            phone: None,
        }
    }

    fn signup(email: &str, name: Option<&str>) -> NewsletterSignup {
        NewsletterSignup {
            email: email.to_string(),
            name: name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_reservation_creates_customer() {
        let db = setup_db().await;
        let mut alice = profile("alice@example.com", Some("Alice"));
        alice.phone = Some("111-111-1111".to_string());

        let created = CustomerService::resolve(&db, &alice, ResolveMode::Reservation)
            .await
            .unwrap();

        assert_eq!(created.name, "Alice");
        assert_eq!(created.email, "alice@example.com");
        assert_eq!(created.phone.as_deref(), Some("111-111-1111"));
        assert!(!created.newsletter);
    }

    #[tokio::test]
    async fn test_reservation_leaves_existing_customer_untouched() {
        let db = setup_db().await;
        let original = CustomerService::subscribe(&db, &signup("alice@example.com", Some("Alice")))
            .await
            .unwrap();

        let resolved = CustomerService::resolve(
            &db,
            &profile("alice@example.com", Some("Alicia")),
            ResolveMode::Reservation,
        )
        .await
        .unwrap();

        assert_eq!(resolved, original);
        assert_eq!(customers::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_repeated_signup_updates_single_row() {
        let db = setup_db().await;

        let first = CustomerService::resolve(
            &db,
            &profile("bob@example.com", Some("Bob")),
            ResolveMode::Reservation,
        )
        .await
        .unwrap();
        assert!(!first.newsletter);

        let second = CustomerService::subscribe(&db, &signup("bob@example.com", None))
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert!(second.newsletter);
        assert_eq!(second.name, "Bob");

        let third = CustomerService::subscribe(&db, &signup("bob@example.com", Some("Robert")))
            .await
            .unwrap();
        assert_eq!(third.id, first.id);
        assert_eq!(third.name, "Robert");

        assert_eq!(customers::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_signup_without_name_uses_guest() {
        let db = setup_db().await;

        let customer = CustomerService::subscribe(&db, &signup("carol@example.com", Some("  ")))
            .await
            .unwrap();

        assert_eq!(customer.name, GUEST_NAME);
        assert!(customer.newsletter);
    }

    #[tokio::test]
    async fn test_invalid_email_writes_nothing() {
        let db = setup_db().await;

        let err = CustomerService::subscribe(&db, &signup("not-an-email", Some("Dan")))
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert_eq!(customers::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_signups_share_one_row() {
        let db = Arc::new(setup_db().await);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let db = Arc::clone(&db);
                tokio::spawn(async move {
                    let name = format!("Eve {i}");
                    CustomerService::subscribe(&*db, &signup("eve@example.com", Some(&name))).await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.dedup();

        assert_eq!(ids.len(), 1);
        assert_eq!(customers::Entity::find().count(&*db).await.unwrap(), 1);
    }
}
