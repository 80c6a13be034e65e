pub mod entities;
pub mod export;
pub mod handlers;
pub mod pipeline;
pub mod sections;
