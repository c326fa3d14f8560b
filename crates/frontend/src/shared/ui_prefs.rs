//! Явная граница сериализации UX-настроек в localStorage: последний
//! выбранный проект, активная вкладка проекта, активный раздел меню.
//! Это только непрерывность интерфейса между перезагрузками, не
//! источник истины.

use web_sys::window;

const ACTIVE_SECTION_KEY: &str = "ui_active_section";
const SELECTED_PROJECT_KEY: &str = "ui_selected_project";
const SELECTED_EMPLOYEE_KEY: &str = "ui_selected_employee";
const PROJECT_TAB_KEY: &str = "ui_project_tab";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

fn save(key: &str, value: &str) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(key, value);
    }
}

fn load(key: &str) -> Option<String> {
    get_local_storage()?.get_item(key).ok()?
}

pub fn save_active_section(key: &str) {
    save(ACTIVE_SECTION_KEY, key);
}

pub fn load_active_section() -> Option<String> {
    load(ACTIVE_SECTION_KEY)
}

pub fn save_selected_project(id: i64) {
    save(SELECTED_PROJECT_KEY, &id.to_string());
}

pub fn load_selected_project() -> Option<i64> {
    load(SELECTED_PROJECT_KEY)?.parse().ok()
}

pub fn save_selected_employee(id: i64) {
    save(SELECTED_EMPLOYEE_KEY, &id.to_string());
}

pub fn load_selected_employee() -> Option<i64> {
    load(SELECTED_EMPLOYEE_KEY)?.parse().ok()
}

pub fn save_project_tab(tab: &str) {
    save(PROJECT_TAB_KEY, tab);
}

pub fn load_project_tab() -> Option<String> {
    load(PROJECT_TAB_KEY)
}
