use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

use crate::shared::ui_prefs;

/// Раздел главного меню
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSection {
    Projects,
    Employees,
    Salary,
    Reports,
    Roster,
}

impl MenuSection {
    pub const ALL: [MenuSection; 5] = [
        MenuSection::Projects,
        MenuSection::Employees,
        MenuSection::Salary,
        MenuSection::Reports,
        MenuSection::Roster,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MenuSection::Projects => "projects",
            MenuSection::Employees => "employees",
            MenuSection::Salary => "salary",
            MenuSection::Reports => "reports",
            MenuSection::Roster => "roster",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MenuSection::Projects => "Проекты",
            MenuSection::Employees => "Сотрудники",
            MenuSection::Salary => "Зарплата",
            MenuSection::Reports => "Отчёты",
            MenuSection::Roster => "Состав на день",
        }
    }

    pub fn from_key(key: &str) -> Option<MenuSection> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub active_section: RwSignal<MenuSection>,
    pub left_open: RwSignal<bool>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        // Последний активный раздел переживает перезагрузку страницы
        let restored = ui_prefs::load_active_section()
            .and_then(|k| MenuSection::from_key(&k))
            .unwrap_or(MenuSection::Projects);
        Self {
            active_section: RwSignal::new(restored),
            left_open: RwSignal::new(true),
        }
    }

    pub fn activate(&self, section: MenuSection) {
        self.active_section.set(section);
        ui_prefs::save_active_section(section.key());
    }

    /// Раздел из строки запроса имеет приоритет над localStorage;
    /// дальше URL держится в синхроне с активным разделом.
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let params: HashMap<String, String> =
            serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
        if let Some(section) = params
            .get("section")
            .and_then(|k| MenuSection::from_key(k))
        {
            self.activate(section);
        }

        let this = *self;
        Effect::new(move |_| {
            let key = this.active_section.get().key();
            let query_string = serde_qs::to_string(&HashMap::from([(
                "section".to_string(),
                key.to_string(),
            )]))
            .unwrap_or_default();
            let new_url = format!("?{}", query_string);

            let current_search = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            if current_search != new_url {
                if let Some(w) = window() {
                    if let Ok(history) = w.history() {
                        let _ = history.replace_state_with_url(
                            &wasm_bindgen::JsValue::NULL,
                            "",
                            Some(&new_url),
                        );
                    }
                }
            }
        });
    }
}
