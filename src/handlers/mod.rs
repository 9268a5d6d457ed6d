pub mod order_cycles;
pub mod orders;

use actix_web::{HttpRequest, HttpResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Header carrying the admin user's API token.
pub const API_TOKEN_HEADER: &str = "X-Spree-Token";

pub(crate) fn api_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(API_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Registers the API token header as the document's security scheme.
struct ApiTokenAddon;

impl Modify for ApiTokenAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "ApiToken",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_TOKEN_HEADER))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&ApiTokenAddon),
    info(
        title = "Hub order service API",
        description = "Admin endpoints for hub orders and order cycles."
    ),
    security(("ApiToken" = [])),
    paths(
        orders::index,
        orders::managed,
        orders::update,
        orders::resend,
        orders::invoice,
        order_cycles::show,
    ),
    components(schemas(
        orders::UpdateOrderRequest,
        orders::LineItemRequest,
        orders::SuccessResponse,
        crate::serializers::order::OrderSerializer,
        crate::serializers::order::OrderListSerializer,
        crate::serializers::order_cycle::OrderCycleSerializer,
        crate::serializers::order_cycle::ExchangeSerializer,
        crate::serializers::order_cycle::IdSerializer,
    )),
    tags(
        (name = "orders", description = "Admin order management"),
        (name = "order_cycles", description = "Admin order cycle views"),
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
