//! Seeds a development database with an admin account and a handful of
//! approved member profiles. Run with: cargo run --bin seed

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use samta_api::models::{Gender, ModerationStatus, NewUser, PlanType, User, UserRole};
use samta_api::store::{MatchStore, PgStore};

fn profile(
    full_name: &str,
    email: &str,
    gender: Gender,
    age: i32,
    city: &str,
    religion: &str,
    mother_tongue: &str,
    occupation: &str,
) -> NewUser {
    NewUser {
        full_name: full_name.to_string(),
        email: email.to_string(),
        gender,
        age,
        height_cm: None,
        marital_status: Some("never_married".to_string()),
        religion: Some(religion.to_string()),
        caste: None,
        mother_tongue: Some(mother_tongue.to_string()),
        city: Some(city.to_string()),
        state: None,
        country: None,
        education: None,
        occupation: Some(occupation.to_string()),
        annual_income: None,
        nri: false,
        bio: None,
        photo_url: None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/samta".to_string());

    println!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;
    println!("Connected successfully!");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let store = PgStore::new(pool);
    let now = Utc::now();

    let admin_email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@samta.app".to_string());
    if store.user_by_email(&admin_email).await?.is_none() {
        let mut admin = User::from_registration(
            Uuid::new_v4(),
            profile(
                "Samta Admin",
                &admin_email,
                Gender::Male,
                35,
                "Bengaluru",
                "Hindu",
                "Kannada",
                "Operations",
            ),
            now,
        );
        admin.role = UserRole::Admin;
        admin.moderation_status = ModerationStatus::Approved;
        store.insert_user(&admin).await?;
        println!("Admin created: {}", admin_email);
    } else {
        println!("Admin already present: {}", admin_email);
    }

    let demo_profiles = [
        profile(
            "Aarav Mehta",
            "aarav@samta.app",
            Gender::Male,
            29,
            "Mumbai",
            "Hindu",
            "Gujarati",
            "Software Engineer",
        ),
        profile(
            "Ananya Iyer",
            "ananya@samta.app",
            Gender::Female,
            27,
            "Chennai",
            "Hindu",
            "Tamil",
            "Chartered Accountant",
        ),
        profile(
            "Rohan Verma",
            "rohan@samta.app",
            Gender::Male,
            31,
            "Delhi",
            "Hindu",
            "Hindi",
            "Civil Engineer",
        ),
        profile(
            "Sneha Patil",
            "sneha@samta.app",
            Gender::Female,
            26,
            "Pune",
            "Hindu",
            "Marathi",
            "Doctor",
        ),
    ];

    let mut created = 0;
    for new in demo_profiles {
        if store.user_by_email(&new.email).await?.is_some() {
            println!("Member already present: {}", new.email);
            continue;
        }

        let mut member = User::from_registration(Uuid::new_v4(), new, now);
        member.moderation_status = ModerationStatus::Approved;
        // One premium account so the unlimited-interest path is exercisable.
        if member.email == "sneha@samta.app" {
            member.apply_plan(PlanType::Gold, now);
        }
        store.insert_user(&member).await?;
        println!("Member created: {}", member.email);
        created += 1;
    }

    println!("\n========================================");
    println!("Seed complete");
    println!("========================================");
    println!("Admin:       {}", admin_email);
    println!("New members: {}", created);
    println!("========================================");
    println!("\nAuthenticate requests with the x-user-id header.");

    Ok(())
}
