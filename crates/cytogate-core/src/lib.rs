pub mod config;
pub mod consts;
pub mod dataset;
pub mod error;
pub mod geom;
pub mod io;
pub mod render;
pub mod selection;
pub mod service;
pub mod session;
pub mod view;
