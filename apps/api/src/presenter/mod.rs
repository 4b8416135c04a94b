// Result presentation: Markdown documents, layout preferences and the paywall.
// Pure state; timers are armed by flow::session.

pub mod markdown;
pub mod paywall;
pub mod view;

pub use view::ResultView;
