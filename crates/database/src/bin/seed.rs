use chrono::{Local, NaiveTime, Utc};
use database::{
    db::create_connection,
    entities::{customers, reservations, waitlist_entries},
};
use log::info;
use models::slot::{TABLES_PER_SLOT, TimeSlot};
use rand::{Rng, seq::IndexedRandom};
use sea_orm::{ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, TransactionTrait};
use uuid::Uuid;

/// Demo customers as (name, email, phone, newsletter)
const CUSTOMERS: [(&str, &str, &str, bool); 6] = [
    ("Alice Johnson", "alice@example.com", "111-111-1111", true),
    ("Bob Smith", "bob@example.com", "222-222-2222", false),
    ("Charlie Brown", "charlie@example.com", "333-333-3333", true),
    ("Diana Prince", "diana@example.com", "444-444-4444", false),
    ("Ethan Hunt", "ethan@example.com", "555-555-5555", true),
    ("Fiona Apple", "fiona@example.com", "666-666-6666", false),
];

/// Replaces all data with demo customers and three partially booked evening slots
#[tokio::main]
async fn main() -> Result<(), DbErr> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let url = std::env::var("DATABASE_URL")
        .map_err(|_| DbErr::Custom("DATABASE_URL must be set".to_string()))?;
    let db = create_connection(&url, 1).await?;

    seed(&db).await?;
    info!("Database seeded with demo customers and reservations");

    Ok(())
}

async fn seed(db: &DatabaseConnection) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    reservations::Entity::delete_many().exec(&txn).await?;
    waitlist_entries::Entity::delete_many().exec(&txn).await?;
    customers::Entity::delete_many().exec(&txn).await?;

    let customer_ids: Vec<Uuid> = CUSTOMERS.iter().map(|_| Uuid::new_v4()).collect();
    let demo_customers = CUSTOMERS
        .iter()
        .zip(&customer_ids)
        .map(|(&(name, email, phone, newsletter), &id)| customers::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            phone: Set(Some(phone.to_string())),
            newsletter: Set(newsletter),
        });
    customers::Entity::insert_many(demo_customers)
        .exec(&txn)
        .await?;

    // Today at 19:00 local time
    let evening = Local::now()
        .date_naive()
        .and_time(NaiveTime::from_hms_opt(19, 0, 0).unwrap_or(NaiveTime::MIN));
    let first = TimeSlot::containing(evening);

    let mut rng = rand::rng();
    let all_tables: Vec<i32> = (1..=TABLES_PER_SLOT).collect();
    let bookings = [
        // Fully booked
        (first, all_tables.clone()),
        (first.offset(1), vec![1, 2, 3]),
        (
            first.offset(2),
            all_tables.choose_multiple(&mut rng, 5).copied().collect(),
        ),
    ];

    let mut rows = Vec::new();
    for (slot, tables) in bookings {
        for table in tables {
            let customer_id = *customer_ids.choose(&mut rng).unwrap_or(&customer_ids[0]);
            rows.push(reservations::ActiveModel {
                id: Set(Uuid::new_v4()),
                customer_id: Set(customer_id),
                time_slot: Set(slot.start()),
                table_number: Set(table),
                party_size: Set(rng.random_range(1..=6)),
                created_at: Set(Utc::now().naive_utc()),
            });
        }
    }

    let count = rows.len();
    reservations::Entity::insert_many(rows).exec(&txn).await?;
    txn.commit().await?;

    info!("Inserted {} customers and {count} reservations", CUSTOMERS.len());
    Ok(())
}
