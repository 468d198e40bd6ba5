use portfolio_media::config::{DEFAULT_PLACEHOLDER_HEIGHT, DEFAULT_PLACEHOLDER_WIDTH};
use portfolio_media::{ImageOptions, MediaLoader, ProgressEvent, ProgressTracker, ResolvedImage};
use yew::prelude::*;

/// Latest progress event broadcast by `tracker`, `None` until the first one.
#[hook]
pub fn use_load_progress(tracker: &ProgressTracker) -> Option<ProgressEvent> {
    let latest = use_state(|| None::<ProgressEvent>);

    {
        let latest = latest.clone();
        use_effect_with(tracker.clone(), move |tracker| {
            let id = tracker.subscribe(move |event| latest.set(Some(event.clone())));
            let tracker = tracker.clone();
            // Unsubscribe when the component unmounts or the tracker changes
            move || {
                tracker.unsubscribe(id);
            }
        });
    }

    (*latest).clone()
}

fn initial_image(loader: &MediaLoader, path: &str) -> ResolvedImage {
    match loader.peek(path) {
        Some(locator) => ResolvedImage::Loaded(locator),
        None => ResolvedImage::Placeholder(loader.placeholders().generate(
            &format!("Loading: {}", path),
            DEFAULT_PLACEHOLDER_WIDTH,
            DEFAULT_PLACEHOLDER_HEIGHT,
        )),
    }
}

/// Resolve `path` through the loader.
///
/// Starts with the cached locator if there is one, otherwise a placeholder,
/// and switches once the eager load settles. A new `path` starts over.
#[hook]
pub fn use_image(loader: &MediaLoader, path: &str) -> ResolvedImage {
    let image = {
        let loader = loader.clone();
        let path = path.to_string();
        use_state(move || initial_image(&loader, &path))
    };
    let current = use_mut_ref(String::new);

    {
        let image = image.clone();
        let loader = loader.clone();
        use_effect_with(path.to_string(), move |path| {
            let path = path.clone();
            *current.borrow_mut() = path.clone();
            image.set(initial_image(&loader, &path));
            wasm_bindgen_futures::spawn_local(async move {
                let resolved = loader
                    .resolve_image(&path, None, ImageOptions::default())
                    .await;
                // A load for an earlier path may finish late
                if *current.borrow() == path {
                    image.set(resolved);
                }
            });
            || ()
        });
    }

    (*image).clone()
}
