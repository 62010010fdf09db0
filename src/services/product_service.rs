use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, SelectTwo,
};
use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    dto::products::{ProductWrite, WriteMode},
    entity::{
        categories::Entity as Categories,
        products::{ActiveModel, Column, Entity as Products},
    },
    error::{AppError, AppResult, FieldErrors, is_unique_violation, push_field_error},
    models::Product,
    response::Meta,
    routes::params::{
        ProductQuery, ProductSortBy, SortOrder, contains_pattern, parse_ordering, search_terms,
    },
    state::AppState,
};

pub const NAME_TAKEN: &str = "product with this name already exists.";
pub const FEATURED_TOGGLED: &str = "featured status updated";

/// Product listing with the API's filters, search and ordering applied.
pub async fn list_products(state: &AppState, query: &ProductQuery) -> AppResult<(Vec<Product>, Meta)> {
    let mut errors = FieldErrors::new();
    let mut condition = search_condition(&search_terms(query.search.as_deref()));

    if let Some(category_id) = category_filter(state, query.category.as_deref(), &mut errors).await? {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }
    if let Some(price) = price_filter(query.price.as_deref(), &mut errors) {
        condition = condition.add(Column::Price.eq(price));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let total = Products::find()
        .filter(condition.clone())
        .count(&state.orm)
        .await? as i64;

    let ordering = parse_ordering::<ProductSortBy>(query.ordering.as_deref());
    let ordering = if ordering.is_empty() {
        vec![(ProductSortBy::CreatedAt, SortOrder::Desc)]
    } else {
        ordering
    };

    let mut finder = apply_ordering(Products::find().filter(condition), &ordering)
        .order_by_asc(Column::Id)
        .find_also_related(Categories);

    let meta = match query.pagination().requested() {
        Some((page, limit, offset)) => {
            finder = finder.limit(limit as u64).offset(offset as u64);
            Meta::new(page, limit, total)
        }
        None => Meta::total(total),
    };

    let items = load_all(state, finder).await?;
    Ok((items, meta))
}

/// Every product in the model's default order, name ascending.
pub async fn all_products(state: &AppState) -> AppResult<Vec<Product>> {
    let finder = Products::find()
        .order_by_asc(Column::Name)
        .find_also_related(Categories);
    load_all(state, finder).await
}

pub async fn featured_products(state: &AppState) -> AppResult<Vec<Product>> {
    let finder = Products::find()
        .filter(Column::IsFeatured.eq(true))
        .order_by_asc(Column::Name)
        .find_also_related(Categories);
    load_all(state, finder).await
}

pub async fn products_in_category(state: &AppState, category_id: i32) -> AppResult<Vec<Product>> {
    let finder = Products::find()
        .filter(Column::CategoryId.eq(category_id))
        .order_by_asc(Column::Name)
        .find_also_related(Categories);
    load_all(state, finder).await
}

pub async fn get_product(state: &AppState, id: i32) -> AppResult<Product> {
    let row = Products::find_by_id(id)
        .find_also_related(Categories)
        .one(&state.orm)
        .await?;
    match row {
        Some((product, category)) => Ok(Product::from_entity(product, category)),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_product(
    state: &AppState,
    actor: Option<Uuid>,
    payload: ProductWrite,
) -> AppResult<Product> {
    let payload = payload.normalized();
    let mut errors = payload.check(WriteMode::Create);
    check_references(state, &payload, None, &mut errors).await?;
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let mut active = ActiveModel {
        description: Set(None),
        stock: Set(0),
        category_id: Set(None),
        is_active: Set(true),
        is_featured: Set(false),
        ..Default::default()
    };
    apply_write(&mut active, payload);
    let model = active.insert(&state.orm).await.map_err(name_conflict)?;

    tracing::info!(product_id = model.id, name = %model.name, "product created");
    audit::record(
        &state.pool,
        actor,
        AuditAction::ProductCreate,
        serde_json::json!({ "product_id": model.id }),
    )
    .await;

    get_product(state, model.id).await
}

/// Apply a write to an existing product. Only supplied fields change.
pub async fn update_product(
    state: &AppState,
    actor: Option<Uuid>,
    id: i32,
    payload: ProductWrite,
    mode: WriteMode,
) -> AppResult<Product> {
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let payload = payload.normalized();
    let mut errors = payload.check(mode);
    check_references(state, &payload, Some(id), &mut errors).await?;
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let mut active: ActiveModel = existing.into();
    apply_write(&mut active, payload);
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.orm).await.map_err(name_conflict)?;

    tracing::info!(product_id = model.id, "product updated");
    audit::record(
        &state.pool,
        actor,
        AuditAction::ProductUpdate,
        serde_json::json!({ "product_id": model.id }),
    )
    .await;

    get_product(state, model.id).await
}

pub async fn delete_product(state: &AppState, actor: Option<Uuid>, id: i32) -> AppResult<()> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(product_id = id, "product deleted");
    audit::record(
        &state.pool,
        actor,
        AuditAction::ProductDelete,
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(())
}

/// Flip `is_featured`. Plain read-modify-write: concurrent toggles race and
/// the last write wins.
pub async fn toggle_featured(state: &AppState, actor: Option<Uuid>, id: i32) -> AppResult<bool> {
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let featured = !existing.is_featured;
    let mut active: ActiveModel = existing.into();
    active.is_featured = Set(featured);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    tracing::info!(product_id = id, featured, "product featured flag toggled");
    audit::record(
        &state.pool,
        actor,
        AuditAction::ProductToggleFeatured,
        serde_json::json!({ "product_id": id, "is_featured": featured }),
    )
    .await;

    Ok(featured)
}

/// Every term must appear in the name or the description.
pub(crate) fn search_condition(terms: &[String]) -> Condition {
    terms.iter().fold(Condition::all(), |condition, term| {
        let pattern = contains_pattern(term);
        condition.add(
            Condition::any()
                .add(Expr::col((Products, Column::Name)).ilike(pattern.clone()))
                .add(Expr::col((Products, Column::Description)).ilike(pattern)),
        )
    })
}

pub(crate) fn apply_ordering(
    mut finder: Select<Products>,
    ordering: &[(ProductSortBy, SortOrder)],
) -> Select<Products> {
    for (field, order) in ordering {
        let column = match field {
            ProductSortBy::CreatedAt => Column::CreatedAt,
            ProductSortBy::Price => Column::Price,
            ProductSortBy::Name => Column::Name,
        };
        finder = match order {
            SortOrder::Asc => finder.order_by_asc(column),
            SortOrder::Desc => finder.order_by_desc(column),
        };
    }
    finder
}

pub(crate) async fn load_all(
    state: &AppState,
    finder: SelectTwo<Products, Categories>,
) -> AppResult<Vec<Product>> {
    let items = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(product, category)| Product::from_entity(product, category))
        .collect();
    Ok(items)
}

/// Resolve the `category` filter; an unusable value is recorded against the parameter.
pub(crate) async fn category_filter(
    state: &AppState,
    raw: Option<&str>,
    errors: &mut FieldErrors,
) -> AppResult<Option<i32>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let invalid = "Select a valid choice. That choice is not one of the available choices.";
    let Ok(category_id) = raw.parse::<i32>() else {
        push_field_error(errors, "category", invalid);
        return Ok(None);
    };
    if Categories::find_by_id(category_id).one(&state.orm).await?.is_none() {
        push_field_error(errors, "category", invalid);
        return Ok(None);
    }
    Ok(Some(category_id))
}

fn price_filter(raw: Option<&str>, errors: &mut FieldErrors) -> Option<Decimal> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match raw.parse::<Decimal>() {
        Ok(price) => Some(price),
        Err(_) => {
            push_field_error(errors, "price", "Enter a number.");
            None
        }
    }
}

/// Store-backed checks: name uniqueness and the category reference.
async fn check_references(
    state: &AppState,
    payload: &ProductWrite,
    exclude_id: Option<i32>,
    errors: &mut FieldErrors,
) -> AppResult<()> {
    if let Some(name) = payload.name.as_deref() {
        if !errors.contains_key("name") {
            let mut finder = Products::find().filter(Column::Name.eq(name));
            if let Some(id) = exclude_id {
                finder = finder.filter(Column::Id.ne(id));
            }
            if finder.count(&state.orm).await? > 0 {
                push_field_error(errors, "name", NAME_TAKEN);
            }
        }
    }

    if let Some(Some(category_id)) = payload.category_id {
        if Categories::find_by_id(category_id).one(&state.orm).await?.is_none() {
            push_field_error(
                errors,
                "category_id",
                format!("Invalid pk \"{category_id}\" - object does not exist."),
            );
        }
    }
    Ok(())
}

fn apply_write(active: &mut ActiveModel, payload: ProductWrite) {
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
}

/// A concurrent insert can slip past the uniqueness pre-check; report it the same way.
fn name_conflict(err: DbErr) -> AppError {
    if is_unique_violation(&err) {
        return AppError::field("name", NAME_TAKEN);
    }
    AppError::OrmError(err)
}
