use crate::entities::{customers, reservations, waitlist_entries};
use chrono::{NaiveTime, TimeDelta};
use models::listing::{ReservationListing, SortKey, SortOrder};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, JoinType, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    sea_query::{Expr, Func},
};
use std::collections::HashMap;
use uuid::Uuid;

pub type ReservationRow = (reservations::Model, Option<customers::Model>);
pub type WaitlistRow = (waitlist_entries::Model, Option<customers::Model>);

/// Read-only queries backing the admin views
pub struct AdminService;

impl AdminService {
    /// Filtered, ordered page of reservations with their customers
    ///
    /// # Returns
    /// The requested page and the number of matching rows across all pages
    pub async fn list_reservations<C: ConnectionTrait>(
        db: &C,
        listing: &ReservationListing,
    ) -> Result<(Vec<ReservationRow>, u64), DbErr> {
        let mut condition = Condition::all();

        if let Some(date) = listing.date {
            let day_start = date.and_time(NaiveTime::MIN);
            condition = condition
                .add(reservations::Column::TimeSlot.gte(day_start))
                .add(reservations::Column::TimeSlot.lt(day_start + TimeDelta::days(1)));
        }

        if let Some(customer) = &listing.customer {
            let pattern = format!("%{}%", customer.to_lowercase());
            condition = condition.add(
                Expr::expr(Func::lower(Expr::col((
                    customers::Entity,
                    customers::Column::Name,
                ))))
                .like(pattern),
            );
        }

        if let Some(table) = listing.table {
            condition = condition.add(reservations::Column::TableNumber.eq(table));
        }

        let order = match listing.sort_order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        let (primary, secondary) = match listing.sort_by {
            SortKey::Time => (
                reservations::Column::TimeSlot,
                reservations::Column::TableNumber,
            ),
            SortKey::Table => (
                reservations::Column::TableNumber,
                reservations::Column::TimeSlot,
            ),
        };

        let query = reservations::Entity::find()
            .join(JoinType::InnerJoin, reservations::Relation::Customer.def())
            .filter(condition)
            .order_by(primary, order.clone())
            .order_by(secondary, order);

        let total_items = query.clone().count(db).await?;
        let paginator = query.paginate(db, listing.per_page);
        let rows = paginator.fetch_page(listing.page - 1).await?; // SeaORM uses 0-based pages

        let customer_ids = rows.iter().map(|r| r.customer_id).collect();
        let customers = Self::customers_by_id(db, customer_ids).await?;

        let rows = rows
            .into_iter()
            .map(|reservation| {
                let customer = customers.get(&reservation.customer_id).cloned();
                (reservation, customer)
            })
            .collect();

        Ok((rows, total_items))
    }

    /// Customers who opted into the newsletter, by name
    pub async fn list_subscribers<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<customers::Model>, DbErr> {
        customers::Entity::find()
            .filter(customers::Column::Newsletter.eq(true))
            .order_by_asc(customers::Column::Name)
            .all(db)
            .await
    }

    /// Waitlist entries by slot, then arrival
    pub async fn list_waitlist<C: ConnectionTrait>(db: &C) -> Result<Vec<WaitlistRow>, DbErr> {
        waitlist_entries::Entity::find()
            .find_also_related(customers::Entity)
            .order_by_asc(waitlist_entries::Column::TimeSlot)
            .order_by_asc(waitlist_entries::Column::CreatedAt)
            .all(db)
            .await
    }

    async fn customers_by_id<C: ConnectionTrait>(
        db: &C,
        ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, customers::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let customers = customers::Entity::find()
            .filter(customers::Column::Id.is_in(ids))
            .all(db)
            .await?;

        Ok(customers.into_iter().map(|c| (c.id, c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_db;
    use chrono::{NaiveDateTime, Utc};
    use models::listing::RawListing;
    use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    async fn add_customer(
        db: &DatabaseConnection,
        name: &str,
        newsletter: bool,
    ) -> customers::Model {
        customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
            phone: Set(None),
            newsletter: Set(newsletter),
        }
        .insert(db)
        .await
        .unwrap()
    }

    async fn add_reservation(
        db: &DatabaseConnection,
        customer: &customers::Model,
        slot: &str,
        table: i32,
    ) {
        reservations::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer.id),
            time_slot: Set(at(slot)),
            table_number: Set(table),
            party_size: Set(2),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await
        .unwrap();
    }

    async fn seeded() -> DatabaseConnection {
        let db = setup_db().await;
        let alice = add_customer(&db, "Alice Johnson", true).await;
        let bob = add_customer(&db, "Bob Smith", false).await;

        add_reservation(&db, &alice, "2099-01-01T19:00", 3).await;
        add_reservation(&db, &bob, "2099-01-01T19:00", 1).await;
        add_reservation(&db, &bob, "2099-01-01T21:00", 7).await;
        add_reservation(&db, &alice, "2099-01-02T19:00", 2).await;

        db
    }

    fn listing(raw: RawListing) -> ReservationListing {
        ReservationListing::resolve(&raw)
    }

    #[tokio::test]
    async fn test_default_listing_sorts_by_time() {
        let db = seeded().await;

        let (rows, total) = AdminService::list_reservations(&db, &ReservationListing::default())
            .await
            .unwrap();

        assert_eq!(total, 4);
        let order: Vec<_> = rows.iter().map(|(r, _)| r.table_number).collect();
        assert_eq!(order, vec![1, 3, 7, 2]);
        assert!(rows.iter().all(|(_, customer)| customer.is_some()));
    }

    #[tokio::test]
    async fn test_filters_combine() {
        let db = seeded().await;

        let (rows, total) = AdminService::list_reservations(
            &db,
            &listing(RawListing {
                date: Some("2099-01-01".to_string()),
                customer: Some("BOB".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(total, 2);
        assert!(
            rows.iter()
                .all(|(_, customer)| customer.as_ref().unwrap().name == "Bob Smith")
        );

        let (rows, total) = AdminService::list_reservations(
            &db,
            &listing(RawListing {
                table: Some("2".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(total, 1);
        assert_eq!(rows[0].0.time_slot, at("2099-01-02T19:00"));
    }

    #[tokio::test]
    async fn test_sort_by_table_descending_with_pages() {
        let db = seeded().await;

        let page = |n: &str| {
            listing(RawListing {
                sort_by: Some("table".to_string()),
                sort_order: Some("desc".to_string()),
                page: Some(n.to_string()),
                per_page: Some("3".to_string()),
                ..Default::default()
            })
        };

        let (first, total) = AdminService::list_reservations(&db, &page("1"))
            .await
            .unwrap();
        let (second, _) = AdminService::list_reservations(&db, &page("2"))
            .await
            .unwrap();

        assert_eq!(total, 4);
        let tables: Vec<_> = first.iter().map(|(r, _)| r.table_number).collect();
        assert_eq!(tables, vec![7, 3, 2]);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].0.table_number, 1);
    }

    #[tokio::test]
    async fn test_huge_page_is_empty() {
        let db = seeded().await;

        let (rows, total) = AdminService::list_reservations(
            &db,
            &listing(RawListing {
                page: Some(i64::MAX.to_string()),
                per_page: Some(u64::MAX.to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(total, 4);
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_only_include_opted_in() {
        let db = seeded().await;
        add_customer(&db, "Aaron Opt", true).await;

        let subscribers = AdminService::list_subscribers(&db).await.unwrap();
        let names: Vec<_> = subscribers.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["Aaron Opt", "Alice Johnson"]);
    }

    #[tokio::test]
    async fn test_waitlist_is_ordered_by_slot_then_arrival() {
        let db = setup_db().await;
        let alice = add_customer(&db, "Alice", false).await;
        let bob = add_customer(&db, "Bob", false).await;

        for (customer, slot, arrived) in [
            (&bob, "2099-01-01T20:00", "2098-12-01T10:00"),
            (&alice, "2099-01-01T19:00", "2098-12-01T11:00"),
            (&bob, "2099-01-01T19:00", "2098-12-01T09:00"),
        ] {
            waitlist_entries::ActiveModel {
                id: Set(Uuid::new_v4()),
                customer_id: Set(customer.id),
                time_slot: Set(at(slot)),
                created_at: Set(at(arrived)),
            }
            .insert(&db)
            .await
            .unwrap();
        }

        let rows = AdminService::list_waitlist(&db).await.unwrap();
        let summary: Vec<_> = rows
            .iter()
            .map(|(entry, customer)| (entry.time_slot, customer.as_ref().unwrap().name.clone()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (at("2099-01-01T19:00"), "Bob".to_string()),
                (at("2099-01-01T19:00"), "Alice".to_string()),
                (at("2099-01-01T20:00"), "Bob".to_string()),
            ]
        );
    }
}
