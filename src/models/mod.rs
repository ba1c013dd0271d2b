pub mod alerta;
pub mod error;
pub mod movimiento;
pub mod notificacion;
pub mod producto;

pub use alerta::{AlertLevel, StockAlert};
pub use error::LedgerError;
pub use movimiento::{Movimiento, MovimientoRequest, MovimientoTipo, ProductoRef, USUARIO_SISTEMA};
pub use notificacion::{Notificacion, NotificacionTipo};
pub use producto::Producto;
