pub mod config;
pub mod dispatch;
pub mod divisions;
pub mod economy;
pub mod extract;
pub mod generic;
pub mod geography;
pub mod government;
pub mod inspect;
pub mod loader;
pub mod markup;
pub mod model;
pub mod pipeline;
pub mod ranking;
pub mod society;
pub mod territory;
pub mod text;
pub mod world;
