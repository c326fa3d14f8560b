use crate::shared::icons::icon;
use leptos::prelude::*;

/// Пагинатор списочных экранов. Размер страницы фиксирован для каждого
/// экрана, страницы 1-базные (как в `contracts::list::ListQuery`).
#[component]
pub fn PaginationControls(
    /// Текущая страница (1-базная)
    #[prop(into)]
    current_page: Signal<usize>,

    /// Всего страниц
    #[prop(into)]
    total_pages: Signal<usize>,

    /// Всего строк после фильтрации
    #[prop(into)]
    total_count: Signal<usize>,

    /// Callback смены страницы
    on_page_change: Callback<usize>,
) -> impl IntoView {
    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let page = current_page.get();
                    if page > 1 {
                        on_page_change.run(page - 1);
                    }
                }
                disabled=move || current_page.get() <= 1
                title="Предыдущая страница"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || {
                    let page = current_page.get();
                    let total = total_pages.get().max(1);
                    let count = total_count.get();
                    format!("{} / {} ({})", page, total, count)
                }}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let page = current_page.get();
                    if page < total_pages.get() {
                        on_page_change.run(page + 1);
                    }
                }
                disabled=move || current_page.get() >= total_pages.get()
                title="Следующая страница"
            >
                {icon("chevron-right")}
            </button>
        </div>
    }
}
