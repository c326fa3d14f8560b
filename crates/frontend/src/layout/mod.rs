pub mod global_context;

use global_context::{AppGlobalContext, MenuSection};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::b001_project::ui::list::ProjectList;
use crate::domain::b002_employee::ui::list::EmployeeList;
use crate::domain::b003_work_report::ui::screen::WorkReportScreen;
use crate::domain::b005_payment::ui::salary::SalaryScreen;
use crate::domain::b006_assignment::ui::roster::RosterScreen;
use crate::shared::icons::icon;
use crate::system::auth::context::{use_auth, use_forced_logout};

/// Каркас: шапка, боковое меню, центральная область.
#[component]
pub fn Shell<L, C>(left: L, center: C) -> impl IntoView
where
    L: Fn() -> AnyView + 'static + Send + Sync,
    C: Fn() -> AnyView + 'static + Send,
{
    let ctx = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");

    view! {
        <div class="app-layout">
            <TopHeader />
            <div class="app-body">
                <Show when=move || ctx.left_open.get()>
                    <aside class="app-sidebar">{left()}</aside>
                </Show>
                <div class="app-main">{center()}</div>
            </div>
        </div>
    }
}

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");
    let (auth_state, _) = use_auth();
    let forced_logout = use_forced_logout();

    let user_name = move || {
        auth_state
            .get()
            .user
            .map(|u| u.display_name())
            .unwrap_or_default()
    };

    let handle_logout = move |_| {
        spawn_local(async move {
            forced_logout.run(());
        });
    };

    view! {
        <header class="top-header">
            <button
                class="button button--icon"
                title="Меню"
                on:click=move |_| ctx.left_open.update(|v| *v = !*v)
            >
                {icon("menu")}
            </button>
            <span class="top-header__title">"Бригада — панель управления"</span>
            <div class="top-header__spacer"></div>
            <span class="top-header__user">{user_name}</span>
            <button class="button button--secondary" on:click=handle_logout>
                {"Выйти"}
            </button>
        </header>
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");

    view! {
        <nav class="sidebar">
            {MenuSection::ALL
                .into_iter()
                .map(|section| {
                    view! {
                        <button
                            class="sidebar__item"
                            class:sidebar__item--active=move || {
                                ctx.active_section.get() == section
                            }
                            on:click=move |_| ctx.activate(section)
                        >
                            {icon(section.key())}
                            <span>{section.title()}</span>
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}

/// Центральная область: экран активного раздела. Каждый экран владеет
/// собственной копией загруженных коллекций, общего стора между
/// экранами нет — консистентность достигается перезагрузкой при входе.
#[component]
pub fn Content() -> impl IntoView {
    let ctx = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");

    view! {
        {move || match ctx.active_section.get() {
            MenuSection::Projects => view! { <ProjectList /> }.into_any(),
            MenuSection::Employees => view! { <EmployeeList /> }.into_any(),
            MenuSection::Salary => view! { <SalaryScreen /> }.into_any(),
            MenuSection::Reports => view! { <WorkReportScreen /> }.into_any(),
            MenuSection::Roster => view! { <RosterScreen /> }.into_any(),
        }}
    }
}
