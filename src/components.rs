//! Yew view components for the portfolio shell.
//!
//! Page content is deliberately thin; the components exist to drive the
//! preloader (navigation, project pages) and show its output (images,
//! loading overlay).

use crate::hooks::{use_image, use_load_progress};
use portfolio_media::{MediaLoader, Preloader, ProjectId, ProjectRecord};
use std::rc::Rc;
use yew::prelude::*;

/// Client-side pages.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Home,
    Projects,
    Project(ProjectId),
    About,
    Contact,
}

impl Page {
    /// Route path, as used for the preload table.
    pub fn path(&self) -> String {
        match self {
            Page::Home => "/".to_string(),
            Page::Projects => "/projects".to_string(),
            Page::Project(id) => format!("/projects/{}", id),
            Page::About => "/about".to_string(),
            Page::Contact => "/contact".to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Projects | Page::Project(_) => "Projects",
            Page::About => "About",
            Page::Contact => "Contact",
        }
    }

    pub fn nav_pages() -> Vec<Page> {
        vec![Page::Home, Page::Projects, Page::About, Page::Contact]
    }
}

/// Full-screen overlay shown until the start-up assets have settled.
///
/// The bar itself shows the session-wide estimate.
#[derive(Properties, PartialEq)]
pub struct LoadingOverlayProps {
    pub preloader: Preloader,
}

#[function_component(LoadingOverlay)]
pub fn loading_overlay(props: &LoadingOverlayProps) -> Html {
    let progress = use_load_progress(props.preloader.tracker());

    if props.preloader.startup_settled() {
        return html! {};
    }
    let (message, percent) = match &progress {
        Some(event) => (event.message.clone(), event.progress),
        None => ("Starting...".to_string(), 0),
    };

    html! {
        <div class="loading-overlay">
            <div class="loading-bar">
                <div class="loading-bar-fill" style={format!("width: {}%", percent)}></div>
            </div>
            <p class="loading-message">{ message }</p>
            <p class="loading-percent">{ format!("{}%", percent) }</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct NavBarProps {
    pub current: Page,
    pub on_navigate: Callback<Page>,
}

#[function_component(NavBar)]
pub fn nav_bar(props: &NavBarProps) -> Html {
    html! {
        <nav class="nav-bar">
            { Page::nav_pages().into_iter().map(|page| {
                let active = page.title() == props.current.title();
                let onclick = {
                    let on_navigate = props.on_navigate.clone();
                    let page = page.clone();
                    Callback::from(move |_| on_navigate.emit(page.clone()))
                };
                html! {
                    <button class={classes!("nav-link", active.then_some("active"))} {onclick}>
                        { page.title() }
                    </button>
                }
            }).collect::<Html>() }
        </nav>
    }
}

/// An image that shows a placeholder until the real asset is available.
#[derive(Properties, PartialEq)]
pub struct MediaImageProps {
    pub loader: MediaLoader,
    pub path: AttrValue,
    #[prop_or_default]
    pub alt: AttrValue,
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(MediaImage)]
pub fn media_image(props: &MediaImageProps) -> Html {
    let image = use_image(&props.loader, &props.path);
    let class = classes!(
        props.class.clone(),
        image.is_placeholder().then_some("is-placeholder")
    );

    html! {
        <img src={image.locator().to_string()} alt={props.alt.clone()} {class} />
    }
}

#[derive(Properties, PartialEq)]
pub struct ProjectListProps {
    pub preloader: Preloader,
    pub projects: Rc<Vec<ProjectRecord>>,
    pub on_navigate: Callback<Page>,
}

#[function_component(ProjectList)]
pub fn project_list(props: &ProjectListProps) -> Html {
    let loader = props.preloader.loader();

    html! {
        <div class="project-grid">
            { props.projects.iter().map(|project| {
                let onclick = {
                    let on_navigate = props.on_navigate.clone();
                    let id = project.id.clone();
                    Callback::from(move |_| on_navigate.emit(Page::Project(id.clone())))
                };
                let cover = match project.primary_image() {
                    Some(path) => html! {
                        <MediaImage loader={loader.clone()}
                            path={path.to_string()}
                            alt={project.title.clone()}
                            class="project-cover" />
                    },
                    None => html! { <div class="project-cover empty"></div> },
                };
                html! {
                    <div class="project-card" key={project.id.to_string()} {onclick}>
                        { cover }
                        <h3>{ project.title.clone() }</h3>
                    </div>
                }
            }).collect::<Html>() }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ProjectDetailProps {
    pub preloader: Preloader,
    pub projects: Rc<Vec<ProjectRecord>>,
    pub id: ProjectId,
    pub on_navigate: Callback<Page>,
}

/// Project page: preloads its own images and its neighbours' covers.
#[function_component(ProjectDetail)]
pub fn project_detail(props: &ProjectDetailProps) -> Html {
    {
        let preloader = props.preloader.clone();
        let projects = props.projects.clone();
        use_effect_with(props.id.clone(), move |id| {
            if let Some(project) = projects.iter().find(|p| &p.id == id) {
                preloader.preload_for_project(project);
                preloader.preload_neighbors(&projects, id.clone());
            }
            || ()
        });
    }

    let index = props.projects.iter().position(|p| p.id == props.id);
    let project = match index {
        Some(i) => &props.projects[i],
        None => {
            return html! {
                <div class="not-found">{ format!("Project {} not found", props.id) }</div>
            };
        }
    };

    let link = |target: Option<&ProjectRecord>, label: &'static str| -> Html {
        match target {
            Some(p) => {
                let on_navigate = props.on_navigate.clone();
                let id = p.id.clone();
                html! {
                    <button class="btn-secondary"
                        onclick={Callback::from(move |_| on_navigate.emit(Page::Project(id.clone())))}>
                        { format!("{} {}", label, p.title) }
                    </button>
                }
            }
            None => html! {},
        }
    };
    let previous = index.and_then(|i| i.checked_sub(1)).and_then(|i| props.projects.get(i));
    let next = index.and_then(|i| props.projects.get(i + 1));
    let loader = props.preloader.loader();

    html! {
        <article class="project-detail">
            <h2>{ project.title.clone() }</h2>
            if !project.has_images() {
                <div class="project-images">
                    { loader.generate_project_placeholders(1).into_iter().map(|src| html! {
                        <img src={src.to_string()} alt={project.title.clone()} class="is-placeholder" />
                    }).collect::<Html>() }
                </div>
            } else {
                <div class="project-images">
                    { project.images.iter().map(|path| html! {
                        <MediaImage key={path.clone()}
                            loader={loader.clone()}
                            path={path.clone()}
                            alt={project.title.clone()} />
                    }).collect::<Html>() }
                </div>
            }
            <div class="project-nav">
                { link(previous, "Previous:") }
                { link(next, "Next:") }
            </div>
        </article>
    }
}

/// Renders the pages without their own state.
pub fn render_static_page(page: &Page, loader: &MediaLoader) -> Html {
    match page {
        Page::Home => html! {
            <section class="hero">
                <MediaImage loader={loader.clone()} path="profile.jpg" alt="Portrait" class="hero-portrait" />
                <h1>{ "Illustration & character design" }</h1>
            </section>
        },
        Page::About => html! {
            <section class="about">
                <MediaImage loader={loader.clone()} path="profile.jpg" alt="Portrait" />
                <p>{ "Illustrator and concept artist." }</p>
            </section>
        },
        Page::Contact => html! {
            <section class="contact">
                <p>{ "Get in touch for commissions and collaborations." }</p>
            </section>
        },
        Page::Projects | Page::Project(_) => html! {},
    }
}
