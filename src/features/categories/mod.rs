//! Categories group items; deleting one removes its items with it.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/categories` | List categories with their items |
//! | POST | `/api/categories` | Create category |
//! | GET | `/api/categories/{id}` | Get category with its items |
//! | PUT/PATCH | `/api/categories/{id}` | Partially update category |
//! | DELETE | `/api/categories/{id}` | Delete category and its items |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CategoryService;
