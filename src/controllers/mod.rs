//! Controllers
//!
//! Resource List Controller genérico (store, proyección, despachador de
//! mutaciones y carga de detalle) y sus adaptadores por recurso.

pub mod dashboard_controller;
pub mod detail;
pub mod dispatcher;
pub mod document_types_controller;
pub mod drivers_controller;
pub mod pricing_controller;
pub mod projection;
pub mod resource_store;
pub mod rewards_controller;
pub mod riders_controller;

pub use dashboard_controller::DashboardController;
pub use detail::{DetailLoader, DetailTicket};
pub use dispatcher::{FormState, MutationDispatcher, Notification, Notifications, Severity};
pub use document_types_controller::DocumentTypesController;
pub use drivers_controller::{DriverDetail, DriversController};
pub use pricing_controller::PricingController;
pub use projection::{paginate, project, FilterSet, ListView, NoFilters, PageView, Searchable};
pub use resource_store::ResourceStore;
pub use rewards_controller::RewardsController;
pub use riders_controller::{RiderDetail, RidersController};
