pub mod namer;
