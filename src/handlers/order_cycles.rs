use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::application::admin_orders::AdminOrderService;
use crate::errors::AppError;
use crate::serializers::order_cycle::OrderCycleSerializer;

use super::api_token;

/// GET /admin/order_cycles/{id}
///
/// The order cycle as the caller is allowed to see it.
#[utoipa::path(
    get,
    path = "/admin/order_cycles/{id}",
    params(
        ("id" = Uuid, Path, description = "Order cycle UUID"),
    ),
    responses(
        (status = 200, description = "Order cycle found", body = OrderCycleSerializer),
        (status = 401, description = "Missing or unknown API token"),
        (status = 404, description = "Order cycle not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "order_cycles"
)]
pub async fn show(
    service: web::Data<AdminOrderService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let token = api_token(&req);
    let service = service.into_inner();

    let serialized = web::block(move || {
        let user = service.authenticate(token.as_deref())?;
        service.order_cycle(&user, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(serialized))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::Value;
    use uuid::Uuid;

    use crate::domain::order_cycle::test_support::fixture;
    use crate::handlers::API_TOKEN_HEADER;
    use crate::testing::{manager_of, InMemory};

    #[actix_web::test]
    async fn coordinator_sees_the_whole_cycle() {
        let store = InMemory::default();
        let f = fixture();
        store.add_order_cycle(f.order_cycle.clone());
        for (enterprise_id, variants) in &f.supplied {
            store.add_supplied(*enterprise_id, variants.clone());
        }
        store.add_user("coordinator-token", manager_of(vec![f.coordinator]));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(store.service()))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/admin/order_cycles/{}", f.order_cycle.id))
            .insert_header((API_TOKEN_HEADER, "coordinator-token"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["viewing_as_coordinator"], true);
        assert_eq!(body["exchanges"].as_array().map(Vec::len), Some(3));
        assert_eq!(body["orders_open_at"], "");
        assert_eq!(
            body["editable_variants_for_incoming_exchanges"][f.producer.to_string()][0],
            f.producer_variant.to_string()
        );
    }

    #[actix_web::test]
    async fn unknown_cycle_is_not_found() {
        let store = InMemory::default();
        store.add_user("token", manager_of(vec![]));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(store.service()))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/admin/order_cycles/{}", Uuid::new_v4()))
            .insert_header((API_TOKEN_HEADER, "token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
