pub mod materials_tab;
