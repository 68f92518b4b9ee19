/*
Wavenstein - by David Petnick
*/
pub mod actors;
pub mod ai;
pub mod ai_patrol;
pub mod arena;
pub mod combat;
pub mod config;
pub mod directory;
pub mod enemies;
pub mod events;
pub mod hud;
pub mod physics;
pub mod pickups;
pub mod player;
