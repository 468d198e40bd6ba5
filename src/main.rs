//! Portfolio single-page application using Yew.
//! Wires navigation, the loading overlay and the asset preloader.

use log::{info, warn, LevelFilter};
use portfolio_media::config::{PreloadConfig, CRITICAL_ASSETS, PROJECTS_JSON};
use portfolio_media::session::mark_user_interaction;
use portfolio_media::web::{browser_preloader, init_logging};
use portfolio_media::{read_projects_from_json, Preloader, ProjectRecord, RoutePreloadTable};
use std::rc::Rc;
use yew::prelude::*;

mod components;
mod hooks;

use components::{render_static_page, LoadingOverlay, NavBar, Page, ProjectDetail, ProjectList};

/// Everything the app builds once at start-up.
struct AppServices {
    preloader: Preloader,
    projects: Rc<Vec<ProjectRecord>>,
}

fn build_services() -> AppServices {
    let routes = RoutePreloadTable::builtin().unwrap_or_else(|err| {
        warn!("{}; route preloading disabled", err);
        RoutePreloadTable::default()
    });
    let projects = read_projects_from_json(PROJECTS_JSON).unwrap_or_else(|err| {
        warn!("Could not read project data: {}", err);
        Vec::new()
    });

    AppServices {
        preloader: browser_preloader(PreloadConfig::default(), routes),
        projects: Rc::new(projects),
    }
}

/// Root component: owns the preloader and the current page.
#[function_component(App)]
fn app() -> Html {
    let services = use_memo((), |_| build_services());
    let page = use_state(|| Page::Home);

    // Initial page load: critical assets plus the landing route
    {
        let preloader = services.preloader.clone();
        use_effect_with((), move |_| {
            info!("Starting initial asset load");
            preloader.initialize_with_route(CRITICAL_ASSETS, &Page::Home.path());
            || ()
        });
    }

    let on_navigate = {
        let page = page.clone();
        let preloader = services.preloader.clone();
        Callback::from(move |target: Page| {
            mark_user_interaction();
            preloader.preload_for_route(&target.path());
            page.set(target);
        })
    };

    let loader = services.preloader.loader();
    let content = match &*page {
        Page::Projects => html! {
            <ProjectList preloader={services.preloader.clone()}
                projects={services.projects.clone()}
                on_navigate={on_navigate.clone()} />
        },
        Page::Project(id) => html! {
            <ProjectDetail preloader={services.preloader.clone()}
                projects={services.projects.clone()}
                id={id.clone()}
                on_navigate={on_navigate.clone()} />
        },
        other => render_static_page(other, loader),
    };

    html! {
        <>
            <LoadingOverlay preloader={services.preloader.clone()} />
            <NavBar current={(*page).clone()} on_navigate={on_navigate} />
            <main class="page-content">
                { content }
            </main>
        </>
    }
}

/// Entry point: logging, panic hook, then the Yew renderer.
fn main() {
    console_error_panic_hook::set_once();
    init_logging(LevelFilter::Info);
    yew::Renderer::<App>::new().render();
}
