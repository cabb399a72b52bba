use wasm_bindgen::prelude::*;
use snooker_engine::*;

mod balls;
mod config;
mod contact;
mod cue;
mod fouls;
mod game;
mod particles;
mod rack;
mod render;
mod table;
mod weather;

use game::SnookerGame;

snooker_web::export_game!(SnookerGame, "snooker", vectors);
