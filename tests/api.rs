//! End-to-end tests over the HTTP surface: a real listener on an ephemeral
//! port, driven with reqwest and a bearer token.

use inventario_backend::{build_app, models::Producto, utils::AuthService, AppState};
use serde_json::{json, Value};

const TEST_SECRET: &str = "secreto-de-integracion-suficientemente-largo-42";

async fn spawn_app() -> (String, String, AppState) {
    let auth_service = AuthService::from_secret(TEST_SECRET).unwrap();
    let token = auth_service.generate_token("u1", "ana").unwrap();
    let state = AppState::new(auth_service);

    state
        .store
        .insertar_producto(Producto {
            id: 1,
            nombre: "Café molido".to_string(),
            precio: 12.5,
            stock_actual: 10,
            stock_minimo: 4,
        })
        .await;
    state
        .store
        .insertar_producto(Producto {
            id: 2,
            nombre: "Azúcar".to_string(),
            precio: 3.0,
            stock_actual: 2,
            stock_minimo: 8,
        })
        .await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_app(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), token, state)
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn health_no_requiere_token() {
    let (base, _token, _state) = spawn_app().await;
    let res = client().get(format!("{base}/api/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn sin_token_responde_401() {
    let (base, _token, _state) = spawn_app().await;
    let res = client()
        .get(format!("{base}/api/productos"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    let res = client()
        .get(format!("{base}/api/productos"))
        .bearer_auth("token-invalido")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn registrar_movimiento_actualiza_stock_y_notifica() {
    let (base, token, _state) = spawn_app().await;
    let c = client();

    let res = c
        .post(format!("{base}/api/movimientos-inventario"))
        .bearer_auth(&token)
        .json(&json!({
            "producto": { "id": 1 },
            "tipo": "ENTRADA",
            "cantidad": 5,
            "motivo": "compra a proveedor"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let movimiento: Value = res.json().await.unwrap();
    assert_eq!(movimiento["stockAnterior"], 10);
    assert_eq!(movimiento["stockPosterior"], 15);
    assert_eq!(movimiento["usuario"], "ana");
    assert_eq!(movimiento["tipo"], "ENTRADA");

    let productos: Vec<Producto> = c
        .get(format!("{base}/api/productos"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(productos.iter().find(|p| p.id == 1).unwrap().stock_actual, 15);

    // The success toast is visible right after the operation.
    let feed: Vec<Value> = c
        .get(format!("{base}/api/notificaciones"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(feed.iter().any(|n| n["type"] == "success"));
}

#[tokio::test]
async fn salida_sin_stock_responde_400_sin_efectos() {
    let (base, token, state) = spawn_app().await;

    let res = client()
        .post(format!("{base}/api/movimientos-inventario"))
        .bearer_auth(&token)
        .json(&json!({
            "producto": { "id": 1 },
            "tipo": "SALIDA",
            "cantidad": 50,
            "motivo": "pedido grande"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["requested"], 50);
    assert_eq!(body["available"], 10);

    assert_eq!(state.store.get_producto(1).await.unwrap().stock_actual, 10);
}

#[tokio::test]
async fn editar_y_eliminar_recalculan_el_historial() {
    let (base, token, _state) = spawn_app().await;
    let c = client();

    let mut ids = Vec::new();
    for (tipo, cantidad) in [("ENTRADA", 10), ("SALIDA", 4), ("ENTRADA", 5)] {
        let res = c
            .post(format!("{base}/api/movimientos-inventario"))
            .bearer_auth(&token)
            .json(&json!({
                "producto": { "id": 2 },
                "tipo": tipo,
                "cantidad": cantidad,
                "motivo": "ajuste de inventario"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        let body: Value = res.json().await.unwrap();
        ids.push(body["id"].as_i64().unwrap());
    }

    let res = c
        .put(format!("{base}/api/movimientos-inventario/{}", ids[1]))
        .bearer_auth(&token)
        .json(&json!({
            "producto": { "id": 2 },
            "tipo": "SALIDA",
            "cantidad": 2,
            "motivo": "corrección de conteo"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let historial: Vec<Value> = c
        .get(format!("{base}/api/movimientos-inventario/producto/2/historial"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let posteriores: Vec<i64> = historial
        .iter()
        .map(|m| m["stockPosterior"].as_i64().unwrap())
        .collect();
    // Baseline 2: [12, 10, 15]
    assert_eq!(posteriores, vec![12, 10, 15]);

    let res = c
        .delete(format!("{base}/api/movimientos-inventario/{}", ids[1]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let historial: Vec<Value> = c
        .get(format!("{base}/api/movimientos-inventario/producto/2/historial"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let posteriores: Vec<i64> = historial
        .iter()
        .map(|m| m["stockPosterior"].as_i64().unwrap())
        .collect();
    assert_eq!(posteriores, vec![12, 17]);
}

#[tokio::test]
async fn edicion_inconsistente_responde_409() {
    let (base, token, _state) = spawn_app().await;
    let c = client();

    let res = c
        .post(format!("{base}/api/movimientos-inventario"))
        .bearer_auth(&token)
        .json(&json!({
            "producto": { "id": 1 },
            "tipo": "SALIDA",
            "cantidad": 8,
            "motivo": "venta"
        }))
        .send()
        .await
        .unwrap();
    let salida: Value = res.json().await.unwrap();

    // Raising the SALIDA above the available stock breaks the chain.
    let res = c
        .put(format!(
            "{base}/api/movimientos-inventario/{}",
            salida["id"].as_i64().unwrap()
        ))
        .bearer_auth(&token)
        .json(&json!({
            "producto": { "id": 1 },
            "tipo": "SALIDA",
            "cantidad": 11,
            "motivo": "venta corregida"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 409);
}

#[tokio::test]
async fn reporte_stock_bajo_lista_los_productos_en_riesgo() {
    let (base, token, _state) = spawn_app().await;
    let productos: Vec<Producto> = client()
        .get(format!("{base}/api/reportes/stock-bajo"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Only product 2 (stock 2 <= minimum 8) is below threshold.
    assert_eq!(productos.len(), 1);
    assert_eq!(productos[0].id, 2);
}

#[tokio::test]
async fn ciclo_de_vida_de_notificaciones() {
    let (base, token, state) = spawn_app().await;
    let c = client();

    let n = state
        .notifier
        .publish(
            inventario_backend::models::NotificacionTipo::Warning,
            "Stock bajo",
            "Azúcar: quedan 2 unidades",
            Some(2),
        )
        .await;

    let res = c
        .post(format!("{base}/api/notificaciones/{}/marcar-leida", n.id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let feed: Vec<Value> = c
        .get(format!("{base}/api/notificaciones"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(feed[0]["leida"], true);

    let res = c
        .delete(format!("{base}/api/notificaciones/{}", n.id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = c
        .delete(format!("{base}/api/notificaciones/{}", n.id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}
