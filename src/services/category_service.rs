use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    dto::{categories::CategoryWrite, products::WriteMode},
    entity::categories::{ActiveModel, Column, Entity as Categories},
    error::{AppError, AppResult, FieldErrors, is_unique_violation, push_field_error},
    models::{Category, Product},
    response::Meta,
    routes::params::{CategoryQuery, CategorySortBy, SortOrder, contains_pattern, parse_ordering, search_terms},
    services::product_service,
    state::AppState,
};

pub const NAME_TAKEN: &str = "category with this name already exists.";

pub async fn list_categories(
    state: &AppState,
    query: &CategoryQuery,
) -> AppResult<(Vec<Category>, Meta)> {
    let condition = search_condition(&search_terms(query.search.as_deref()));

    let total = Categories::find()
        .filter(condition.clone())
        .count(&state.orm)
        .await? as i64;

    let order = parse_ordering::<CategorySortBy>(query.ordering.as_deref())
        .first()
        .map(|(_, order)| *order)
        .unwrap_or(SortOrder::Asc);

    let mut finder = Categories::find().filter(condition);
    finder = match order {
        SortOrder::Asc => finder.order_by_asc(Column::Name),
        SortOrder::Desc => finder.order_by_desc(Column::Name),
    };

    let meta = match query.pagination().requested() {
        Some((page, limit, offset)) => {
            finder = finder.limit(limit as u64).offset(offset as u64);
            Meta::new(page, limit, total)
        }
        None => Meta::total(total),
    };

    let items = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    Ok((items, meta))
}

/// Every category by name; used to populate the product form.
pub async fn all_categories(state: &AppState) -> AppResult<Vec<Category>> {
    let items = Categories::find()
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    Ok(items)
}

pub async fn get_category(state: &AppState, id: i32) -> AppResult<Category> {
    let result = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Category::from);
    match result {
        Some(c) => Ok(c),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_category(
    state: &AppState,
    actor: Option<Uuid>,
    payload: CategoryWrite,
) -> AppResult<Category> {
    let payload = payload.normalized();
    let mut errors = payload.check(WriteMode::Create);
    check_unique_name(state, &payload, None, &mut errors).await?;
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let mut active = ActiveModel {
        description: Set(None),
        ..Default::default()
    };
    apply_write(&mut active, payload);
    let model = active.insert(&state.orm).await.map_err(name_conflict)?;

    tracing::info!(category_id = model.id, name = %model.name, "category created");
    audit::record(
        &state.pool,
        actor,
        AuditAction::CategoryCreate,
        serde_json::json!({ "category_id": model.id }),
    )
    .await;

    Ok(Category::from(model))
}

pub async fn update_category(
    state: &AppState,
    actor: Option<Uuid>,
    id: i32,
    payload: CategoryWrite,
    mode: WriteMode,
) -> AppResult<Category> {
    let existing = Categories::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let payload = payload.normalized();
    let mut errors = payload.check(mode);
    check_unique_name(state, &payload, Some(id), &mut errors).await?;
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let mut active: ActiveModel = existing.into();
    apply_write(&mut active, payload);
    let model = active.update(&state.orm).await.map_err(name_conflict)?;

    tracing::info!(category_id = model.id, "category updated");
    audit::record(
        &state.pool,
        actor,
        AuditAction::CategoryUpdate,
        serde_json::json!({ "category_id": model.id }),
    )
    .await;

    Ok(Category::from(model))
}

/// Delete a category. The store nulls `category_id` on its products.
pub async fn delete_category(state: &AppState, actor: Option<Uuid>, id: i32) -> AppResult<()> {
    let result = Categories::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(category_id = id, "category deleted");
    audit::record(
        &state.pool,
        actor,
        AuditAction::CategoryDelete,
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(())
}

pub async fn category_products(state: &AppState, id: i32) -> AppResult<Vec<Product>> {
    let category = get_category(state, id).await?;
    product_service::products_in_category(state, category.id).await
}

pub(crate) fn search_condition(terms: &[String]) -> Condition {
    terms.iter().fold(Condition::all(), |condition, term| {
        let pattern = contains_pattern(term);
        condition.add(
            Condition::any()
                .add(Expr::col((Categories, Column::Name)).ilike(pattern.clone()))
                .add(Expr::col((Categories, Column::Description)).ilike(pattern)),
        )
    })
}

async fn check_unique_name(
    state: &AppState,
    payload: &CategoryWrite,
    exclude_id: Option<i32>,
    errors: &mut FieldErrors,
) -> AppResult<()> {
    let Some(name) = payload.name.as_deref() else {
        return Ok(());
    };
    if errors.contains_key("name") {
        return Ok(());
    }
    let mut finder = Categories::find().filter(Column::Name.eq(name));
    if let Some(id) = exclude_id {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.count(&state.orm).await? > 0 {
        push_field_error(errors, "name", NAME_TAKEN);
    }
    Ok(())
}

fn apply_write(active: &mut ActiveModel, payload: CategoryWrite) {
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
}

fn name_conflict(err: DbErr) -> AppError {
    if is_unique_violation(&err) {
        return AppError::field("name", NAME_TAKEN);
    }
    AppError::OrmError(err)
}
