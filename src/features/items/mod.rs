//! Catalog items, each owned by exactly one category.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/items` | List items with their category |
//! | POST | `/api/items` | Create item |
//! | GET | `/api/items/{id}` | Get item with its category |
//! | PUT/PATCH | `/api/items/{id}` | Partially update item |
//! | DELETE | `/api/items/{id}` | Delete item |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ItemService;
