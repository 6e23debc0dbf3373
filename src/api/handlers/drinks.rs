/*
 * Responsibility
 * - /drinks 系 CRUD handler
 * - 認可は Authorized<Scope> extractor で済ませる (body / path より先に評価される)
 * - Path / Json の rejection は AppError (404 / 413 / 422) に寄せて envelope を揃える
 * - PATCH は存在確認 (404) を body の検証 (422) より先に行う
 */
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection, rejection::PathRejection},
    http::StatusCode,
};

use crate::{
    api::{
        dto::drinks::{
            CreateDrinkRequest, DeleteResponse, DrinkLong, DrinkShort, DrinksResponse,
            UpdateDrinkRequest, encode_recipe,
        },
        extractors::authorized::{
            Authorized, DeleteDrinks, GetDrinks, GetDrinksDetail, PatchDrinks, PostDrinks,
        },
    },
    error::AppError,
    repos::drink_repo::DrinkRow,
    state::AppState,
};

fn to_long(rows: Vec<DrinkRow>) -> Result<Vec<DrinkLong>, AppError> {
    let mut res = Vec::with_capacity(rows.len());
    for row in rows {
        res.push(DrinkLong::try_from(row)?);
    }
    Ok(res)
}

// 整数以外の id はルート不一致と同じ扱い
fn drink_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

// body 上限超過 (DefaultBodyLimit) だけは 413、それ以外は 422
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(v)| v).map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::unprocessable(e.body_text())
        }
    })
}

pub async fn list_drinks(
    State(state): State<AppState>,
    _auth: Authorized<GetDrinks>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let rows = state.drinks.list().await?;
    let drinks = to_long(rows)?.into_iter().map(DrinkShort::from).collect();

    Ok(Json(DrinksResponse::new(drinks)))
}

pub async fn list_drinks_detail(
    State(state): State<AppState>,
    _auth: Authorized<GetDrinksDetail>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let rows = state.drinks.list().await?;

    Ok(Json(DrinksResponse::new(to_long(rows)?)))
}

pub async fn create_drink(
    State(state): State<AppState>,
    auth: Authorized<PostDrinks>,
    body: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let (title, recipe) = json_body(body)?
        .into_parts()
        .map_err(AppError::unprocessable)?;

    let row = state.drinks.create(&title, &encode_recipe(&recipe)).await?;
    tracing::info!(drink_id = row.id, sub = ?auth.claims.sub, "drink created");

    Ok(Json(DrinksResponse::new(vec![DrinkLong::try_from(row)?])))
}

pub async fn update_drink(
    State(state): State<AppState>,
    auth: Authorized<PatchDrinks>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let id = drink_id(path)?;
    if state.drinks.get(id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let (title, recipe) = json_body(body)?
        .into_parts()
        .map_err(AppError::unprocessable)?;

    let recipe = recipe.as_deref().map(encode_recipe);
    let row = state
        .drinks
        .update(id, title.as_deref(), recipe.as_deref())
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(drink_id = id, sub = ?auth.claims.sub, "drink updated");

    Ok(Json(DrinksResponse::new(vec![DrinkLong::try_from(row)?])))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    auth: Authorized<DeleteDrinks>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = drink_id(path)?;

    if !state.drinks.delete(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(drink_id = id, sub = ?auth.claims.sub, "drink deleted");

    Ok(Json(DeleteResponse {
        success: true,
        delete: id,
    }))
}
