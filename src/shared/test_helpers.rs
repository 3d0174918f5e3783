#[cfg(test)]
use sqlx::PgPool;

#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use crate::shared::constants::ROLE_ADMIN;

#[cfg(test)]
pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "test-admin-sub".to_string(),
        roles: vec![ROLE_ADMIN.to_string()],
    }
}

#[cfg(test)]
pub fn create_regular_user(sub: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: sub.to_string(),
        roles: Vec::new(),
    }
}

#[cfg(test)]
pub async fn seed_category(pool: &PgPool, name: &str, slug: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO categories (name, slug, description) VALUES ($1, $2, '') RETURNING id",
    )
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await
    .expect("seed category")
}

#[cfg(test)]
pub async fn seed_print_item(pool: &PgPool, category_id: Uuid, title: &str, status: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO print_items
            (title, description, category_id, author_id,
             print_time_hours, filament_amount_grams, status)
        VALUES ($1, 'seeded for tests', $2, 'seed-author', 2, 100, $3::print_status)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(category_id)
    .bind(status)
    .fetch_one(pool)
    .await
    .expect("seed print item")
}
