//! Database seeder for MioSaaS development and testing.
//!
//! Seeds a demo company with a user, registries, one commessa and a few
//! rapportini for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use miosaas_core::auth::hash_password;
use miosaas_db::entities::{
    clienti, commesse, companies, company_users, fornitori, rapportini,
    sea_orm_active_enums::{CommessaStato, MembershipRole},
    users,
};

/// Demo company ID (consistent for all seeds)
const DEMO_COMPANY_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Demo commessa ID (consistent for all seeds)
const DEMO_COMMESSA_ID: &str = "00000000-0000-0000-0000-000000000003";
/// Demo cliente ID (consistent for all seeds)
const DEMO_CLIENTE_ID: &str = "00000000-0000-0000-0000-000000000004";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    // The seeder runs one-off; a minimal pool is enough.
    let database = miosaas_shared::config::DatabaseConfig {
        url: database_url,
        max_connections: 2,
        min_connections: 1,
    };

    println!("Connecting to database...");
    let db = miosaas_db::connect(&database)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo user...");
    seed_demo_user(&db).await;

    println!("Seeding demo company...");
    seed_demo_company(&db).await;

    println!("Seeding registries...");
    seed_registries(&db).await;

    println!("Seeding commessa...");
    seed_commessa(&db).await;

    println!("Seeding rapportini...");
    seed_rapportini(&db).await;

    println!("Seeding complete!");
}

fn demo_company_id() -> Uuid {
    Uuid::parse_str(DEMO_COMPANY_ID).unwrap()
}

fn demo_user_id() -> Uuid {
    Uuid::parse_str(DEMO_USER_ID).unwrap()
}

fn demo_commessa_id() -> Uuid {
    Uuid::parse_str(DEMO_COMMESSA_ID).unwrap()
}

fn demo_cliente_id() -> Uuid {
    Uuid::parse_str(DEMO_CLIENTE_ID).unwrap()
}

/// Seeds the demo user with a known password.
async fn seed_demo_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(demo_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo user already exists, skipping...");
        return;
    }

    let password_hash = hash_password("demo-password").expect("Failed to hash demo password");

    let user = users::ActiveModel {
        id: Set(demo_user_id()),
        email: Set("demo@miosaas.dev".to_string()),
        password_hash: Set(password_hash),
        full_name: Set("Mario Rossi".to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert demo user: {e}");
    } else {
        println!("  Created demo user: demo@miosaas.dev (password: demo-password)");
    }
}

/// Seeds the demo company and the owner membership.
async fn seed_demo_company(db: &DatabaseConnection) {
    if companies::Entity::find_by_id(demo_company_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo company already exists, skipping...");
        return;
    }

    let company = companies::ActiveModel {
        id: Set(demo_company_id()),
        name: Set("Edilizia Rossi S.r.l.".to_string()),
        slug: Set("edilizia-rossi".to_string()),
        partita_iva: Set(Some("01234567890".to_string())),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = company.insert(db).await {
        eprintln!("Failed to insert demo company: {e}");
        return;
    }

    let membership = company_users::ActiveModel {
        company_id: Set(demo_company_id()),
        user_id: Set(demo_user_id()),
        role: Set(MembershipRole::Owner),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = membership.insert(db).await {
        eprintln!("Failed to insert demo membership: {e}");
    } else {
        println!("  Created demo company: Edilizia Rossi S.r.l.");
    }
}

/// Seeds one cliente and a couple of fornitori.
async fn seed_registries(db: &DatabaseConnection) {
    if clienti::Entity::find_by_id(demo_cliente_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Registries already seeded, skipping...");
        return;
    }

    let cliente = clienti::ActiveModel {
        id: Set(demo_cliente_id()),
        company_id: Set(demo_company_id()),
        denominazione: Set("Condominio Via Garibaldi 12".to_string()),
        partita_iva: Set(None),
        codice_fiscale: Set(Some("97012340158".to_string())),
        indirizzo: Set(Some("Via Garibaldi 12, Milano".to_string())),
        email: Set(Some("amministratore@viagaribaldi12.it".to_string())),
        telefono: Set(Some("02 1234567".to_string())),
        note: Set(None),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = cliente.insert(db).await {
        eprintln!("Failed to insert demo cliente: {e}");
    }

    for (denominazione, partita_iva) in [
        ("Ferramenta Bianchi", "09876543210"),
        ("Calcestruzzi Lombardi S.p.A.", "11223344556"),
    ] {
        let fornitore = fornitori::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(demo_company_id()),
            denominazione: Set(denominazione.to_string()),
            partita_iva: Set(Some(partita_iva.to_string())),
            codice_fiscale: Set(None),
            indirizzo: Set(None),
            email: Set(None),
            telefono: Set(None),
            note: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = fornitore.insert(db).await {
            eprintln!("Failed to insert demo fornitore: {e}");
        }
    }

    println!("  Created 1 cliente and 2 fornitori");
}

/// Seeds a demo commessa linked to the demo cliente.
async fn seed_commessa(db: &DatabaseConnection) {
    if commesse::Entity::find_by_id(demo_commessa_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo commessa already exists, skipping...");
        return;
    }

    let commessa = commesse::ActiveModel {
        id: Set(demo_commessa_id()),
        company_id: Set(demo_company_id()),
        codice: Set("COM-2026-001".to_string()),
        descrizione: Set("Rifacimento facciata condominio".to_string()),
        cliente_id: Set(Some(demo_cliente_id())),
        stato: Set(CommessaStato::Aperta),
        indirizzo: Set(Some("Via Garibaldi 12, Milano".to_string())),
        data_inizio: Set(NaiveDate::from_ymd_opt(2026, 3, 2)),
        data_fine: Set(None),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = commessa.insert(db).await {
        eprintln!("Failed to insert demo commessa: {e}");
    } else {
        println!("  Created demo commessa: COM-2026-001");
    }
}

/// Seeds a few rapportini on the demo commessa.
async fn seed_rapportini(db: &DatabaseConnection) {
    let existing = rapportini::Entity::find().one(db).await.ok().flatten();
    if existing.is_some() {
        println!("  Rapportini already seeded, skipping...");
        return;
    }

    let rows = [
        ("Luca Verdi", (2026, 3, 2), dec!(8.0), Some("Montaggio ponteggio")),
        ("Luca Verdi", (2026, 3, 3), dec!(7.5), None),
        ("Giuseppe Russo", (2026, 3, 3), dec!(8.0), Some("Demolizione intonaco")),
    ];

    for (operaio, (y, m, d), ore, note) in rows {
        let rapportino = rapportini::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(demo_company_id()),
            commessa_id: Set(demo_commessa_id()),
            operaio: Set(operaio.to_string()),
            data: Set(NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            ore: Set(ore),
            note: Set(note.map(String::from)),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = rapportino.insert(db).await {
            eprintln!("Failed to insert rapportino: {e}");
        }
    }

    println!("  Created 3 rapportini");
}
