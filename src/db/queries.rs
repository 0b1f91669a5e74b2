use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior, params, types::Value};

use crate::error::{AppError, Result};
use crate::models::*;
use crate::util::extend_validity;

use super::from_row::{
    MANAGER_COLS, PRODUCT_COLS, PRODUCT_IMAGE_COLS, STOCK_LOG_COLS, USER_COLS, query_all,
    query_one,
};

fn now() -> i64 {
    Utc::now().timestamp()
}

/// Builder for dynamic UPDATE statements with optional fields.
/// Combines multiple field updates into a single query.
struct UpdateBuilder {
    table: &'static str,
    id: i64,
    fields: Vec<(&'static str, Value)>,
    track_updated_at: bool,
}

impl UpdateBuilder {
    fn new(table: &'static str, id: i64) -> Self {
        Self {
            table,
            id,
            fields: Vec::new(),
            track_updated_at: false,
        }
    }

    fn with_updated_at(mut self) -> Self {
        self.track_updated_at = true;
        self
    }

    fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((column, value.into()));
        self
    }

    fn execute(mut self, conn: &Connection) -> Result<bool> {
        if self.fields.is_empty() {
            return Ok(false);
        }
        if self.track_updated_at {
            self.fields.push(("updated_at", now().into()));
        }
        let sets: Vec<String> = self
            .fields
            .iter()
            .map(|(col, _)| format!("{} = ?", col))
            .collect();
        let mut values: Vec<Value> = self.fields.into_iter().map(|(_, v)| v).collect();
        values.push(self.id.into());
        let sql = format!("UPDATE {} SET {} WHERE id = ?", self.table, sets.join(", "));
        let affected = conn.execute(&sql, rusqlite::params_from_iter(values))?;
        Ok(affected > 0)
    }
}

// ============ Users ============

fn insert_user(
    conn: &Connection,
    name: &str,
    email: &str,
    password_hash: &str,
    role: UserRole,
    status: UserStatus,
) -> Result<User> {
    let now = now();
    conn.execute(
        "INSERT INTO users (name, email, password_hash, role, status, logged_in, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)",
        params![name, email, password_hash, role.as_ref(), status.as_ref(), now],
    )?;

    Ok(User {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        role,
        status,
        logged_in: false,
        created_at: now,
        updated_at: now,
    })
}

/// Create a user together with its role-specific row, atomically.
///
/// `email` must already be normalized. Fails with `Conflict` when the email
/// is taken and `NotFound` when an employee's manager does not exist.
pub fn create_account(
    conn: &mut Connection,
    input: &SignupRequest,
    email: &str,
    password_hash: &str,
) -> Result<User> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if get_user_by_email(&tx, email)?.is_some() {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let name = input.account().name.trim();
    let user = insert_user(&tx, name, email, password_hash, input.role(), UserStatus::Pending)?;
    let now = now();

    match input {
        SignupRequest::Employee(s) => {
            if get_manager_by_id(&tx, s.manager_id)?.is_none() {
                return Err(AppError::NotFound("Manager not found".into()));
            }
            tx.execute(
                "INSERT INTO employees (user_id, manager_id, name, email, mobile_no, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![user.id, s.manager_id, name, email, s.mobile_no.as_deref().map(str::trim), now],
            )?;
        }
        SignupRequest::Manager(s) => {
            // Rate starts at zero; validity starts now and is extended by payments
            tx.execute(
                "INSERT INTO managers (user_id, manager_name, email, mobile_no, company_name,
                                       rate_per_day, validity, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6, ?6)",
                params![user.id, name, email, s.mobile_no.trim(), s.company_name.trim(), now],
            )?;
        }
        SignupRequest::Customer(s) => {
            tx.execute(
                "INSERT INTO customers (user_id, name, email, mobile_no, address, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![user.id, name, email, s.mobile_no.trim(), s.address.trim(), now],
            )?;
        }
    }

    tx.commit()?;
    Ok(user)
}

/// Create an approved super-admin account if none exists for `email`.
/// Returns the new user, or `None` if the email is already registered.
pub fn ensure_superadmin(
    conn: &Connection,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<Option<User>> {
    if get_user_by_email(conn, email)?.is_some() {
        return Ok(None);
    }
    let user = insert_user(
        conn,
        name,
        email,
        password_hash,
        UserRole::Superadmin,
        UserStatus::Approved,
    )?;
    Ok(Some(user))
}

pub fn get_user_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE id = ?1", USER_COLS),
        &[&id],
    )
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE email = ?1", USER_COLS),
        &[&email],
    )
}

/// Users in a given approval state, excluding super-admins.
pub fn list_users_by_status(conn: &Connection, status: UserStatus) -> Result<Vec<User>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM users WHERE status = ?1 AND role != 'superadmin' ORDER BY created_at, id",
            USER_COLS
        ),
        &[&status.as_ref()],
    )
}

/// Change a user's approval state. Anything other than approval also ends
/// the user's session.
pub fn set_user_status(conn: &Connection, id: i64, status: UserStatus) -> Result<bool> {
    let mut update = UpdateBuilder::new("users", id)
        .with_updated_at()
        .set("status", status.as_ref().to_string());
    if status != UserStatus::Approved {
        update = update.set("logged_in", false);
    }
    update.execute(conn)
}

pub fn set_logged_in(conn: &Connection, id: i64, logged_in: bool) -> Result<bool> {
    UpdateBuilder::new("users", id)
        .with_updated_at()
        .set("logged_in", logged_in)
        .execute(conn)
}

/// Replace a user's password hash and log them out.
pub fn update_password(conn: &Connection, id: i64, password_hash: &str) -> Result<bool> {
    UpdateBuilder::new("users", id)
        .with_updated_at()
        .set("password_hash", password_hash.to_string())
        .set("logged_in", false)
        .execute(conn)
}

// ============ Managers ============

pub fn get_manager_by_id(conn: &Connection, id: i64) -> Result<Option<Manager>> {
    query_one(
        conn,
        &format!("SELECT {} FROM managers WHERE id = ?1", MANAGER_COLS),
        &[&id],
    )
}

pub fn list_managers(conn: &Connection) -> Result<Vec<Manager>> {
    query_all(
        conn,
        &format!("SELECT {} FROM managers ORDER BY id", MANAGER_COLS),
        &[],
    )
}

/// Record a payment: set the manager's daily rate and extend their validity
/// by `extension_days` (see [`extend_validity`]).
///
/// The read and the write share one IMMEDIATE transaction, so concurrent
/// payments for the same manager are applied one after the other and no
/// extension is lost.
pub fn apply_manager_payment(
    conn: &mut Connection,
    manager_id: i64,
    rate_per_day: f64,
    extension_days: i64,
    now: DateTime<Utc>,
) -> Result<Manager> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let manager = get_manager_by_id(&tx, manager_id)?
        .ok_or_else(|| AppError::NotFound("Manager not found".into()))?;

    let new_validity = extend_validity(manager.validity, now, extension_days)?;

    UpdateBuilder::new("managers", manager_id)
        .with_updated_at()
        .set("rate_per_day", rate_per_day)
        .set("validity", new_validity.timestamp())
        .execute(&tx)?;

    let updated = get_manager_by_id(&tx, manager_id)?
        .ok_or_else(|| AppError::Internal("Manager vanished during update".into()))?;

    tx.commit()?;
    Ok(updated)
}

// ============ Products ============

#[allow(clippy::too_many_arguments)]
fn insert_product_row(
    conn: &Connection,
    parent_id: Option<i64>,
    title: &str,
    description: &str,
    sku: Option<&str>,
    price: f64,
    stock: i64,
    options: Option<&OptionMap>,
    created_at: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO products (parent_id, title, description, sku, price, stock, options, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            parent_id,
            title,
            description,
            sku,
            price,
            stock,
            options.map(|o| o.to_json()),
            created_at
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_images(
    conn: &Connection,
    product_id: i64,
    images: &[NewProductImage],
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO product_images (product_id, url, alt_text, is_primary)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for image in images {
        stmt.execute(params![product_id, image.url.trim(), image.alt_text, image.is_primary])?;
    }
    Ok(())
}

fn insert_stock_log(
    conn: &Connection,
    product_id: i64,
    log: &NewStockLog,
    created_at: i64,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO stock_logs (product_id, type, quantity, note, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![product_id, log.kind.as_ref(), log.quantity, log.note, created_at],
    )?;
    Ok(())
}

/// Insert the parent row, its images, and every variant with its images and
/// initial stock log. Returns the parent id.
fn insert_product_tree(conn: &Connection, input: &NewProduct) -> rusqlite::Result<i64> {
    let now = now();
    let description = input.description.trim();

    let parent_id = insert_product_row(
        conn,
        None,
        input.title.trim(),
        description,
        input.normalized_sku(),
        input.price,
        input.stock,
        input.options.as_ref().filter(|o| !o.is_empty()),
        now,
    )?;
    insert_images(conn, parent_id, &input.images)?;

    if input.variants.is_empty() {
        insert_stock_log(
            conn,
            parent_id,
            &NewStockLog::initial(input.stock, DEFAULT_STOCK_NOTE),
            now,
        )?;
        return Ok(parent_id);
    }

    for variant in &input.variants {
        let sku = variant
            .sku
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let variant_id = insert_product_row(
            conn,
            Some(parent_id),
            &variant.title(input.title.trim()),
            description,
            sku,
            variant.price,
            variant.stock,
            Some(&variant.options),
            now,
        )?;
        insert_images(conn, variant_id, &variant.images)?;
        insert_stock_log(conn, variant_id, &variant.initial_stock_log(), now)?;
    }

    Ok(parent_id)
}

/// Persist a whole product tree in one transaction and return it as stored.
///
/// Any failure rolls everything back; the error is reported as
/// `Persistence` carrying the underlying message.
pub fn create_product_tree(conn: &mut Connection, input: &NewProduct) -> Result<ProductTree> {
    let failed = |e: rusqlite::Error| AppError::Persistence(format!("Failed to create product: {}", e));

    let tx = conn.transaction().map_err(failed)?;
    let parent_id = insert_product_tree(&tx, input).map_err(failed)?;
    tx.commit().map_err(failed)?;

    get_product_tree(conn, parent_id)?
        .ok_or_else(|| AppError::Internal("Created product not found".into()))
}

pub fn get_product_by_id(conn: &Connection, id: i64) -> Result<Option<Product>> {
    query_one(
        conn,
        &format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLS),
        &[&id],
    )
}

/// Products that are not variants of another product, newest first.
pub fn list_top_level_products(conn: &Connection) -> Result<Vec<Product>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM products WHERE parent_id IS NULL ORDER BY created_at DESC, id DESC",
            PRODUCT_COLS
        ),
        &[],
    )
}

pub fn list_variants(conn: &Connection, parent_id: i64) -> Result<Vec<Product>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM products WHERE parent_id = ?1 ORDER BY id",
            PRODUCT_COLS
        ),
        &[&parent_id],
    )
}

pub fn list_product_images(conn: &Connection, product_id: i64) -> Result<Vec<ProductImage>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM product_images WHERE product_id = ?1 ORDER BY id",
            PRODUCT_IMAGE_COLS
        ),
        &[&product_id],
    )
}

pub fn list_stock_logs(conn: &Connection, product_id: i64) -> Result<Vec<StockLog>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM stock_logs WHERE product_id = ?1 ORDER BY id",
            STOCK_LOG_COLS
        ),
        &[&product_id],
    )
}

fn load_tree(conn: &Connection, product: Product) -> Result<ProductTree> {
    let images = list_product_images(conn, product.id)?;
    let stock_logs = list_stock_logs(conn, product.id)?;
    let variants = list_variants(conn, product.id)?
        .into_iter()
        .map(|variant| load_tree(conn, variant))
        .collect::<Result<Vec<_>>>()?;

    Ok(ProductTree {
        product,
        images,
        stock_logs,
        variants,
    })
}

pub fn get_product_tree(conn: &Connection, id: i64) -> Result<Option<ProductTree>> {
    get_product_by_id(conn, id)?
        .map(|product| load_tree(conn, product))
        .transpose()
}

pub fn count_products(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
    Ok(count)
}
