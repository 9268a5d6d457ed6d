use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::admin_orders::{
    AdminOrderService, LineItemChange, OrderChanges, OrderFilter, OrderPage,
};
use crate::errors::AppError;
use crate::serializers::order::{OrderListSerializer, OrderSerializer};

use super::api_token;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Comma-separated distributor ids.
    pub distributor_ids: Option<String>,
    /// Comma-separated order cycle ids.
    pub order_cycle_ids: Option<String>,
    /// Page number (1-based). Defaults to 1.
    pub page: Option<i64>,
    /// Orders per page, at most 100.
    pub per_page: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    pub page: Option<i64>,
    /// Defaults to 25, at most 100.
    pub per_page: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LineItemRequest {
    pub id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub email: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: String,
}

/// Parses `a,b,c` into ids. Blank input means no filter.
fn parse_ids(raw: Option<String>) -> Result<Option<Vec<Uuid>>, AppError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(None);
    };
    raw.split(',')
        .map(|part| {
            let part = part.trim();
            Uuid::parse_str(part)
                .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", part)))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn order_list(page: OrderPage) -> OrderListSerializer {
    OrderListSerializer {
        items: page.items.iter().map(OrderSerializer::from).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /admin/orders
///
/// Orders distributed by the caller's enterprises, newest first.
#[utoipa::path(
    get,
    path = "/admin/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Paginated list of orders", body = OrderListSerializer),
        (status = 400, description = "Malformed filter"),
        (status = 401, description = "Missing or unknown API token"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn index(
    service: web::Data<AdminOrderService>,
    req: HttpRequest,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let filter = OrderFilter {
        distributor_ids: parse_ids(params.distributor_ids)?,
        order_cycle_ids: parse_ids(params.order_cycle_ids)?,
        page: params.page,
        per_page: params.per_page,
    };
    let token = api_token(&req);
    let service = service.into_inner();

    let page = web::block(move || {
        let user = service.authenticate(token.as_deref())?;
        service.index(&user, filter)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(order_list(page)))
}

/// GET /admin/orders/managed
///
/// Every order the caller may edit, oldest first.
#[utoipa::path(
    get,
    path = "/admin/orders/managed",
    params(PageParams),
    responses(
        (status = 200, description = "Paginated list of editable orders", body = OrderListSerializer),
        (status = 401, description = "Missing or unknown API token"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn managed(
    service: web::Data<AdminOrderService>,
    req: HttpRequest,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let token = api_token(&req);
    let service = service.into_inner();

    let page = web::block(move || {
        let user = service.authenticate(token.as_deref())?;
        service.managed(&user, params.page, params.per_page)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(order_list(page)))
}

/// PUT /admin/orders/{number}
///
/// Applies the edits and recalculates fees, tax and voucher adjustments.
#[utoipa::path(
    put,
    path = "/admin/orders/{number}",
    params(
        ("number" = String, Path, description = "Order number"),
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderSerializer),
        (status = 400, description = "Invalid edit"),
        (status = 401, description = "Missing or unknown API token"),
        (status = 403, description = "Order belongs to another enterprise"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update(
    service: web::Data<AdminOrderService>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let number = path.into_inner();
    let body = body.into_inner();
    let changes = OrderChanges {
        email: body.email,
        line_items: body
            .line_items
            .into_iter()
            .map(|li| LineItemChange {
                id: li.id,
                quantity: li.quantity,
            })
            .collect(),
    };
    let token = api_token(&req);
    let service = service.into_inner();

    let order = web::block(move || {
        let user = service.authenticate(token.as_deref())?;
        service.update(&user, &number, changes)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderSerializer::from(&order)))
}

/// POST /admin/orders/{number}/resend
#[utoipa::path(
    post,
    path = "/admin/orders/{number}/resend",
    params(
        ("number" = String, Path, description = "Order number"),
    ),
    responses(
        (status = 200, description = "Confirmation email queued", body = SuccessResponse),
        (status = 401, description = "Missing or unknown API token"),
        (status = 403, description = "Order belongs to another enterprise"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn resend(
    service: web::Data<AdminOrderService>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let number = path.into_inner();
    let token = api_token(&req);
    let service = service.into_inner();

    web::block(move || {
        let user = service.authenticate(token.as_deref())?;
        service.resend(&user, &number)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(SuccessResponse {
        success: "Order email resent".to_string(),
    }))
}

/// POST /admin/orders/{number}/invoice
#[utoipa::path(
    post,
    path = "/admin/orders/{number}/invoice",
    params(
        ("number" = String, Path, description = "Order number"),
    ),
    responses(
        (status = 200, description = "Invoice email queued", body = SuccessResponse),
        (status = 401, description = "Missing or unknown API token"),
        (status = 403, description = "Order belongs to another enterprise"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn invoice(
    service: web::Data<AdminOrderService>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let number = path.into_inner();
    let token = api_token(&req);
    let service = service.into_inner();

    web::block(move || {
        let user = service.authenticate(token.as_deref())?;
        service.invoice(&user, &number)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(SuccessResponse {
        success: "Invoice email sent".to_string(),
    }))
}
