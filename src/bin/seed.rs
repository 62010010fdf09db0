use product_catalog::{
    db::{create_pool, run_migrations},
    services::auth_service::hash_password,
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();
    let database_url = std::env::var("DATABASE_URL")?;

    let pool = create_pool(&database_url, 2).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "admin").await?;
    let user_id = ensure_user(&pool, "user@example.com", "user1234", "user").await?;
    seed_catalog(&pool).await?;

    tracing::info!(%admin_id, %user_id, "seed completed");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    tracing::info!(email, role, "ensured user");
    Ok(user_id)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let categories = [
        ("Electronics", "Phones, laptops and accessories"),
        ("Books", "Printed and digital books"),
        ("Home", "Kitchen and household goods"),
    ];

    for (name, description) in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
    }

    let products = [
        ("Smartphone X", "Flagship phone with a 6.5 inch display", "699.00", 25, "Electronics"),
        ("Phone Case", "Shock-absorbing case for Smartphone X", "19.99", 150, "Electronics"),
        ("USB-C Charger", "65W fast charger", "39.50", 80, "Electronics"),
        ("The Rust Book", "Learn Rust from the ground up", "45.00", 40, "Books"),
        ("Chef Knife", "8 inch stainless steel", "59.90", 30, "Home"),
    ];

    for (name, description, price, stock, category) in products {
        let price: Decimal = price.parse()?;
        sqlx::query(
            r#"
            INSERT INTO products (name, description, price, stock, category_id)
            VALUES ($1, $2, $3, $4, (SELECT id FROM categories WHERE name = $5))
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(stock)
        .bind(category)
        .execute(pool)
        .await?;
    }

    tracing::info!("seeded catalog");
    Ok(())
}
