use sqlx::{PgPool, postgres::PgExecutor};

use crate::{
    error::Result,
    models::{ClientType, UpdateUserRequest, User, UserRole, UserSummary},
};

pub struct NewUser<'a> {
    pub client_type: ClientType,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub cpf: Option<&'a str>,
    pub cnpj: Option<&'a str>,
    pub phone: &'a str,
    pub street: &'a str,
    pub number: &'a str,
    pub complement: &'a str,
    pub district: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub role: UserRole,
}

pub async fn create_user(pool: &PgPool, user: &NewUser<'_>) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (
            client_type, name, email, password, cpf, cnpj, phone,
            street, number, complement, district, city, state, role
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(user.client_type)
    .bind(user.name)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.cpf)
    .bind(user.cnpj)
    .bind(user.phone)
    .bind(user.street)
    .bind(user.number)
    .bind(user.complement)
    .bind(user.district)
    .bind(user.city)
    .bind(user.state)
    .bind(user.role)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i32) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(user)
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<UserSummary>> {
    let users = sqlx::query_as::<_, UserSummary>(
        "SELECT id, name, email, city, state, role, segment, total_spent
         FROM users
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn update_user(pool: &PgPool, id: i32, req: &UpdateUserRequest) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET
            name = COALESCE($1, name),
            email = COALESCE($2, email),
            phone = COALESCE($3, phone),
            street = COALESCE($4, street),
            number = COALESCE($5, number),
            complement = COALESCE($6, complement),
            district = COALESCE($7, district),
            city = COALESCE($8, city),
            state = COALESCE($9, state),
            updated_at = NOW()
        WHERE id = $10
        RETURNING *
        "#,
    )
    .bind(&req.name)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(&req.street)
    .bind(&req.number)
    .bind(&req.complement)
    .bind(&req.district)
    .bind(&req.city)
    .bind(&req.state)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn update_role_by_email(
    pool: &PgPool,
    email: &str,
    role: UserRole,
) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET role = $1, updated_at = NOW() WHERE email = $2 RETURNING *",
    )
    .bind(role)
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
