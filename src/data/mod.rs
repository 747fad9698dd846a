pub mod catalog;
pub mod game_data;
pub mod input;
pub mod item;
pub mod ship;

pub use catalog::{
    load_catalog_json, load_denylist, save_catalog_json, Catalog, CatalogFile, Denylist,
};
pub use game_data::{load_game_data_dir, parse_game_data, GameData};
pub use input::{load_input, parse_input, LoadoutInput};
pub use item::{Item, ItemStats};
pub use ship::{cooling_inefficiency, Ship};
