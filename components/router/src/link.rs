use rill_core::{Attributes, EventHandler, IntoChildren, Node, attrs, create_element};

use crate::Router;

impl Router {
    /// Builds an `<a href=path>` that navigates through this router when
    /// clicked instead of following the link.
    ///
    /// Caller attributes override the defaults. When `path` is the current
    /// path the link also gets an `active` class and `aria-current="page"`.
    /// The click handler holds a weak reference, so links never keep a
    /// dropped router alive.
    pub fn link(&self, path: &str, attributes: Attributes, children: impl IntoChildren) -> Node {
        let router = self.downgrade();
        let target = path.to_owned();
        let on_click = EventHandler::new(move |event| {
            event.prevent_default();
            if let Some(router) = Self::upgrade(&router) {
                router.navigate(&target);
            }
        });

        let mut attributes = attrs()
            .set("href", path)
            .set("onClick", on_click)
            .merge(attributes);

        if self.is_active(path) {
            let mut classes: Vec<String> = ["class", "className"]
                .into_iter()
                .filter_map(|name| attributes.remove(name))
                .filter_map(|value| value.as_string())
                .filter(|class| !class.is_empty())
                .collect();
            classes.push("active".to_owned());
            attributes.insert("class", classes.join(" "));
            attributes.insert("aria-current", "page");
        }

        create_element("a", attributes, children)
    }
}
