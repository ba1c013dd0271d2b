pub mod inventario;
pub mod notificaciones;
