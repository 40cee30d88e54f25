//! Buddy Renderers
//!
//! This crate provides the animation controllers that buddy views register
//! with the [`BuddyCoordinator`]. Every view renders with exactly one backend,
//! chosen once when the app is composed:
//!
//! - [`NativeRenderer`] - native state-machine engine with a numeric mood input
//! - [`WebRenderer`] - browser canvas engine with one boolean per mood
//! - [`PlaceholderRenderer`] - hand-animated fallback with no engine
//!
//! # Example
//!
//! ```rust
//! use buddy_coordinator::{BuddyCoordinator, Mood, RendererKind};
//! use buddy_render::{BuddySize, BuddyView};
//!
//! let buddy = BuddyCoordinator::default();
//! let view = BuddyView::mount(RendererKind::Placeholder, BuddySize::Medium, &buddy);
//!
//! buddy.on_add_subject();
//! assert!(view.describe().contains("excited"));
//! ```

pub mod inputs;
pub mod native;
pub mod placeholder;
pub mod web;

use std::sync::Arc;

use buddy_coordinator::{
    BuddyController, BuddyCoordinator, ControllerId, ControllerRegistration, RendererKind,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use inputs::{Input, InputSet};
pub use native::NativeRenderer;
pub use placeholder::{PlaceholderFace, PlaceholderRenderer, TriggerEdges};
pub use web::WebRenderer;

// ============================================================================
// Sizes and ids
// ============================================================================

/// Display size of a buddy view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuddySize {
    /// 56 x 56.
    Tiny,
    /// 84 x 84.
    Small,
    /// 120 x 120.
    #[default]
    Medium,
    /// 180 x 180.
    Large,
    /// 220 x 220, used on the home screen.
    Hero,
}

impl BuddySize {
    /// Width and height in pixels.
    #[must_use]
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Tiny => (56, 56),
            Self::Small => (84, 84),
            Self::Medium => (120, 120),
            Self::Large => (180, 180),
            Self::Hero => (220, 220),
        }
    }
}

const ID_SUFFIX_LEN: usize = 6;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a controller id of the form `buddy-<unix millis>-<6 base36 chars>`.
#[must_use]
pub fn generate_controller_id() -> ControllerId {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect();
    ControllerId::new(format!(
        "buddy-{}-{suffix}",
        chrono::Utc::now().timestamp_millis()
    ))
}

pub(crate) fn format_input(input: Input) -> String {
    match input {
        Input::Number(value) => format!("{value}"),
        Input::Boolean(true) => "on".to_string(),
        Input::Boolean(false) => "off".to_string(),
        Input::Trigger(count) => format!("x{count}"),
    }
}

// ============================================================================
// Backend selection
// ============================================================================

/// Platform the app runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// iOS device.
    Ios,
    /// Android device.
    Android,
    /// Browser.
    Web,
    /// Anything else, e.g. a desktop dev build.
    Other,
}

impl Platform {
    /// Platform this binary was built for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Web
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "android") {
            Self::Android
        } else {
            Self::Other
        }
    }
}

/// Picks the renderer for a platform.
///
/// Mobile platforms use the native engine when it is linked in; browsers use
/// the canvas engine; everything else falls back to the placeholder.
#[must_use]
pub const fn select_renderer(platform: Platform, native_engine_available: bool) -> RendererKind {
    match platform {
        Platform::Ios | Platform::Android if native_engine_available => RendererKind::Native,
        Platform::Web => RendererKind::Web,
        _ => RendererKind::Placeholder,
    }
}

// ============================================================================
// BuddyView
// ============================================================================

/// Controller owned by one mounted view.
#[derive(Debug, Clone)]
pub enum Renderer {
    /// Native engine.
    Native(Arc<NativeRenderer>),
    /// Web canvas engine.
    Web(Arc<WebRenderer>),
    /// Fallback.
    Placeholder(Arc<PlaceholderRenderer>),
}

impl Renderer {
    /// Builds a renderer of the given kind.
    #[must_use]
    pub fn build(kind: RendererKind, id: ControllerId) -> Self {
        match kind {
            RendererKind::Native => Self::Native(Arc::new(NativeRenderer::new(id))),
            RendererKind::Web => Self::Web(Arc::new(WebRenderer::new(id))),
            RendererKind::Placeholder => {
                Self::Placeholder(Arc::new(PlaceholderRenderer::new(id)))
            }
        }
    }

    /// Which backend this is.
    #[must_use]
    pub const fn kind(&self) -> RendererKind {
        match self {
            Self::Native(_) => RendererKind::Native,
            Self::Web(_) => RendererKind::Web,
            Self::Placeholder(_) => RendererKind::Placeholder,
        }
    }

    /// The renderer as a coordinator controller.
    #[must_use]
    pub fn controller(&self) -> Arc<dyn BuddyController> {
        match self {
            Self::Native(native) => Arc::clone(native) as Arc<dyn BuddyController>,
            Self::Web(web) => Arc::clone(web) as Arc<dyn BuddyController>,
            Self::Placeholder(placeholder) => Arc::clone(placeholder) as Arc<dyn BuddyController>,
        }
    }

    /// One-line description of what the renderer shows.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Native(native) => native.describe(),
            Self::Web(web) => web.describe(),
            Self::Placeholder(placeholder) => placeholder.render_line(),
        }
    }
}

/// A mounted buddy view.
///
/// Mounting registers the view's controller; dropping the view unregisters
/// it.
#[derive(Debug)]
pub struct BuddyView {
    renderer: Renderer,
    size: BuddySize,
    registration: ControllerRegistration,
}

impl BuddyView {
    /// Mounts a view with a fresh controller id.
    pub fn mount(kind: RendererKind, size: BuddySize, coordinator: &BuddyCoordinator) -> Self {
        Self::mount_renderer(Renderer::build(kind, generate_controller_id()), size, coordinator)
    }

    /// Mounts a view around an already built renderer.
    pub fn mount_renderer(
        renderer: Renderer,
        size: BuddySize,
        coordinator: &BuddyCoordinator,
    ) -> Self {
        let registration = coordinator.attach(renderer.controller());
        tracing::debug!(
            controller = %registration.id(),
            renderer = %renderer.kind(),
            ?size,
            "Buddy view mounted"
        );
        Self {
            renderer,
            size,
            registration,
        }
    }

    /// Id of this view's controller.
    #[must_use]
    pub const fn id(&self) -> &ControllerId {
        self.registration.id()
    }

    /// The view's renderer.
    #[must_use]
    pub const fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// The view's display size.
    #[must_use]
    pub const fn size(&self) -> BuddySize {
        self.size
    }

    /// One-line description of what the view shows.
    #[must_use]
    pub fn describe(&self) -> String {
        self.renderer.describe()
    }
}
