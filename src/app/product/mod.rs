//! 产品应用

pub mod handler;
pub mod model;
pub mod store;

use crate::core::server::Server;

/// 注册产品路由
pub fn register(server: &mut Server) {
    server.get("/health", handler::health_check);
    server.get("/products", handler::list_products);
    server.get("/products/:id", handler::get_product);
    server.post("/products", handler::create_product);
    server.delete("/products/:id", handler::delete_product);
}
