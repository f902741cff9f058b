//! Postgres backend.
//!
//! Uniqueness and atomicity are delegated to the database: every scoped
//! uniqueness rule is a unique index, and a 23505 from the driver surfaces as
//! `Conflict`. Every query carries the tenant in its WHERE clause, so
//! cross-tenant access is structurally impossible rather than filtered after
//! the fact.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{QueryBuilder, Row};

use taller_core::{
    ClientId, DomainError, DomainResult, MechanicId, Page, PageParams, TenantId, TenantScope,
    UserId, VehicleId,
};
use taller_workshop::{Client, Company, Mechanic, User};

use async_trait::async_trait;

use super::{ClientStore, CompanyStore, MechanicStore, SearchFilter, UserStore};

/// Bounded wait for a pooled connection; a saturated or unreachable database
/// answers `Unavailable` instead of hanging the request.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const UNIQUE_VIOLATION: &str = "23505";

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str) -> DomainResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(|e| DomainError::unavailable(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| DomainError::internal(format!("migration failed: {e}")))?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx(err: sqlx::Error, conflict_msg: &'static str) -> DomainError {
    match &err {
        sqlx::Error::RowNotFound => DomainError::NotFound,
        sqlx::Error::PoolTimedOut => DomainError::unavailable("connection pool timed out"),
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            DomainError::conflict(conflict_msg)
        }
        _ => DomainError::internal(err.to_string()),
    }
}

// Read paths can't hit a unique violation.
fn map_read(err: sqlx::Error) -> DomainError {
    map_sqlx(err, "duplicate key")
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> DomainResult<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::internal(format!("column {name}: {e}")))
}

fn company_from_row(row: &PgRow) -> DomainResult<Company> {
    Ok(Company {
        id: TenantId::from_uuid(column(row, "id")?),
        name: column(row, "name")?,
        document: column(row, "document")?,
        address: column(row, "address")?,
        phone: column(row, "phone")?,
        logo: column(row, "logo")?,
        active: column(row, "active")?,
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    })
}

fn user_from_row(row: &PgRow) -> DomainResult<User> {
    let role: String = column(row, "role")?;
    let company_id: Option<uuid::Uuid> = column(row, "company_id")?;
    Ok(User {
        id: UserId::from_uuid(column(row, "id")?),
        name: column(row, "name")?,
        email: column(row, "email")?,
        password_hash: column(row, "password_hash")?,
        role: role
            .parse()
            .map_err(|e| DomainError::internal(format!("stored role: {e}")))?,
        company_id: company_id.map(TenantId::from_uuid),
        active: column(row, "active")?,
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    })
}

fn client_from_row(row: &PgRow) -> DomainResult<Client> {
    let address: serde_json::Value = column(row, "address")?;
    let vehicles: Vec<uuid::Uuid> = column(row, "vehicles")?;
    Ok(Client {
        id: ClientId::from_uuid(column(row, "id")?),
        name: column(row, "name")?,
        document_number: column(row, "document_number")?,
        address: serde_json::from_value(address)
            .map_err(|e| DomainError::internal(format!("stored address: {e}")))?,
        telephone: column(row, "telephone")?,
        email: column(row, "email")?,
        company_id: TenantId::from_uuid(column(row, "company_id")?),
        active: column(row, "active")?,
        vehicles: vehicles.into_iter().map(VehicleId::from_uuid).collect(),
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    })
}

fn mechanic_from_row(row: &PgRow) -> DomainResult<Mechanic> {
    Ok(Mechanic {
        id: MechanicId::from_uuid(column(row, "id")?),
        name: column(row, "name")?,
        telephone: column(row, "telephone")?,
        company_id: TenantId::from_uuid(column(row, "company_id")?),
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    })
}

fn like_pattern(filter: &SearchFilter) -> Option<String> {
    filter.needle().map(|n| format!("%{n}%"))
}

fn push_user_filters<'a>(
    qb: &mut QueryBuilder<'a, sqlx::Postgres>,
    scope: &TenantScope,
    pattern: Option<&str>,
) {
    if let Some(tenant) = scope.tenant() {
        qb.push(" AND company_id = ").push_bind(*tenant.as_uuid());
    }
    if let Some(p) = pattern {
        let p = p.to_string();
        qb.push(" AND (name ILIKE ")
            .push_bind(p.clone())
            .push(" OR email ILIKE ")
            .push_bind(p)
            .push(")");
    }
}

fn push_client_filters<'a>(
    qb: &mut QueryBuilder<'a, sqlx::Postgres>,
    company_id: TenantId,
    pattern: Option<&str>,
) {
    qb.push(" WHERE company_id = ").push_bind(*company_id.as_uuid());
    if let Some(p) = pattern {
        let p = p.to_string();
        qb.push(" AND (name ILIKE ")
            .push_bind(p.clone())
            .push(" OR document_number ILIKE ")
            .push_bind(p.clone())
            .push(" OR telephone ILIKE ")
            .push_bind(p.clone())
            .push(" OR COALESCE(email, '') ILIKE ")
            .push_bind(p)
            .push(")");
    }
}

fn push_mechanic_filters<'a>(
    qb: &mut QueryBuilder<'a, sqlx::Postgres>,
    company_id: TenantId,
    pattern: Option<&str>,
) {
    qb.push(" WHERE company_id = ").push_bind(*company_id.as_uuid());
    if let Some(p) = pattern {
        let p = p.to_string();
        qb.push(" AND (name ILIKE ")
            .push_bind(p.clone())
            .push(" OR telephone ILIKE ")
            .push_bind(p)
            .push(")");
    }
}

#[async_trait]
impl CompanyStore for PostgresStore {
    async fn insert(&self, company: Company) -> DomainResult<Company> {
        sqlx::query(
            r#"
            INSERT INTO companies (id, name, document, address, phone, logo, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(company.id.as_uuid())
        .bind(&company.name)
        .bind(&company.document)
        .bind(&company.address)
        .bind(&company.phone)
        .bind(&company.logo)
        .bind(company.active)
        .bind(company.created_at)
        .bind(company.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "company document already exists"))?;

        Ok(company)
    }

    async fn get(&self, id: TenantId) -> DomainResult<Company> {
        let row = sqlx::query("SELECT * FROM companies WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read(e))?
            .ok_or(DomainError::NotFound)?;
        company_from_row(&row)
    }

    async fn find_by_document(&self, document: &str) -> DomainResult<Option<Company>> {
        let row = sqlx::query("SELECT * FROM companies WHERE document = $1")
            .bind(document)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read(e))?;
        row.as_ref().map(company_from_row).transpose()
    }

    async fn remove(&self, id: TenantId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_read(e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn insert(&self, user: User) -> DomainResult<User> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, company_id, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.company_id.map(|c| *c.as_uuid()))
        .bind(user.active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "user email already exists"))?;

        Ok(user)
    }

    async fn update(&self, user: User) -> DomainResult<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, role = $5,
                company_id = $6, active = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.company_id.map(|c| *c.as_uuid()))
        .bind(user.active)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "user email already exists"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(user)
    }

    async fn get(&self, scope: &TenantScope, id: UserId) -> DomainResult<User> {
        let mut qb = QueryBuilder::new("SELECT * FROM users WHERE id = ");
        qb.push_bind(*id.as_uuid());
        if let Some(tenant) = scope.tenant() {
            qb.push(" AND company_id = ").push_bind(*tenant.as_uuid());
        }

        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read(e))?
            .ok_or(DomainError::NotFound)?;
        user_from_row(&row)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read(e))?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn list(
        &self,
        scope: &TenantScope,
        filter: &SearchFilter,
        page: PageParams,
    ) -> DomainResult<Page<User>> {
        let pattern = like_pattern(filter);

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE TRUE");
        push_user_filters(&mut count_qb, scope, pattern.as_deref());
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read(e))?;

        let mut qb = QueryBuilder::new("SELECT * FROM users WHERE TRUE");
        push_user_filters(&mut qb, scope, pattern.as_deref());
        qb.push(" ORDER BY name COLLATE \"es_ci\"")
            .push(" LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_read(e))?;
        let items = rows
            .iter()
            .map(user_from_row)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Page::new(items, total as u64, page))
    }
}

#[async_trait]
impl ClientStore for PostgresStore {
    async fn insert(&self, client: Client) -> DomainResult<Client> {
        let address = serde_json::to_value(&client.address)
            .map_err(|e| DomainError::internal(e.to_string()))?;
        let vehicles: Vec<uuid::Uuid> = client.vehicles.iter().map(|v| *v.as_uuid()).collect();

        sqlx::query(
            r#"
            INSERT INTO clients (id, name, document_number, address, telephone, email,
                                 company_id, active, vehicles, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(client.id.as_uuid())
        .bind(&client.name)
        .bind(&client.document_number)
        .bind(address)
        .bind(&client.telephone)
        .bind(&client.email)
        .bind(client.company_id.as_uuid())
        .bind(client.active)
        .bind(vehicles)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "client document number or email already exists"))?;

        Ok(client)
    }

    async fn update(&self, client: Client) -> DomainResult<Client> {
        let address = serde_json::to_value(&client.address)
            .map_err(|e| DomainError::internal(e.to_string()))?;

        // company_id is deliberately absent from SET: tenant ownership is
        // immutable, the WHERE clause pins it.
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET name = $3, document_number = $4, address = $5, telephone = $6,
                email = $7, active = $8, updated_at = $9
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(client.id.as_uuid())
        .bind(client.company_id.as_uuid())
        .bind(&client.name)
        .bind(&client.document_number)
        .bind(address)
        .bind(&client.telephone)
        .bind(&client.email)
        .bind(client.active)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "client document number or email already exists"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(client)
    }

    async fn get(&self, company_id: TenantId, id: ClientId) -> DomainResult<Client> {
        let row = sqlx::query("SELECT * FROM clients WHERE id = $1 AND company_id = $2")
            .bind(id.as_uuid())
            .bind(company_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read(e))?
            .ok_or(DomainError::NotFound)?;
        client_from_row(&row)
    }

    async fn remove(&self, company_id: TenantId, id: ClientId) -> DomainResult<Client> {
        let row = sqlx::query(
            "DELETE FROM clients WHERE id = $1 AND company_id = $2 RETURNING *",
        )
        .bind(id.as_uuid())
        .bind(company_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_read(e))?
        .ok_or(DomainError::NotFound)?;
        client_from_row(&row)
    }

    async fn list(
        &self,
        company_id: TenantId,
        filter: &SearchFilter,
        page: PageParams,
    ) -> DomainResult<Page<Client>> {
        let pattern = like_pattern(filter);

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM clients");
        push_client_filters(&mut count_qb, company_id, pattern.as_deref());
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read(e))?;

        let mut qb = QueryBuilder::new("SELECT * FROM clients");
        push_client_filters(&mut qb, company_id, pattern.as_deref());
        qb.push(" ORDER BY name COLLATE \"es_ci\"")
            .push(" LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_read(e))?;
        let items = rows
            .iter()
            .map(client_from_row)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Page::new(items, total as u64, page))
    }
}

#[async_trait]
impl MechanicStore for PostgresStore {
    async fn insert(&self, mechanic: Mechanic) -> DomainResult<Mechanic> {
        sqlx::query(
            r#"
            INSERT INTO mechanics (id, name, telephone, company_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(mechanic.id.as_uuid())
        .bind(&mechanic.name)
        .bind(&mechanic.telephone)
        .bind(mechanic.company_id.as_uuid())
        .bind(mechanic.created_at)
        .bind(mechanic.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "mechanic already exists"))?;

        Ok(mechanic)
    }

    async fn update(&self, mechanic: Mechanic) -> DomainResult<Mechanic> {
        let result = sqlx::query(
            r#"
            UPDATE mechanics
            SET name = $3, telephone = $4, updated_at = $5
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(mechanic.id.as_uuid())
        .bind(mechanic.company_id.as_uuid())
        .bind(&mechanic.name)
        .bind(&mechanic.telephone)
        .bind(mechanic.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_read(e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(mechanic)
    }

    async fn get(&self, company_id: TenantId, id: MechanicId) -> DomainResult<Mechanic> {
        let row = sqlx::query("SELECT * FROM mechanics WHERE id = $1 AND company_id = $2")
            .bind(id.as_uuid())
            .bind(company_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read(e))?
            .ok_or(DomainError::NotFound)?;
        mechanic_from_row(&row)
    }

    async fn remove(&self, company_id: TenantId, id: MechanicId) -> DomainResult<Mechanic> {
        let row = sqlx::query(
            "DELETE FROM mechanics WHERE id = $1 AND company_id = $2 RETURNING *",
        )
        .bind(id.as_uuid())
        .bind(company_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_read(e))?
        .ok_or(DomainError::NotFound)?;
        mechanic_from_row(&row)
    }

    async fn list(
        &self,
        company_id: TenantId,
        filter: &SearchFilter,
        page: PageParams,
    ) -> DomainResult<Page<Mechanic>> {
        let pattern = like_pattern(filter);

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM mechanics");
        push_mechanic_filters(&mut count_qb, company_id, pattern.as_deref());
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read(e))?;

        let mut qb = QueryBuilder::new("SELECT * FROM mechanics");
        push_mechanic_filters(&mut qb, company_id, pattern.as_deref());
        qb.push(" ORDER BY name COLLATE \"es_ci\"")
            .push(" LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_read(e))?;
        let items = rows
            .iter()
            .map(mechanic_from_row)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Page::new(items, total as u64, page))
    }
}
