pub mod composite;
pub mod executor;
pub mod ffmpeg;
