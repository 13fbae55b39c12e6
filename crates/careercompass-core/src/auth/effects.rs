use crate::routes::Route;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Default,
    /// Failure styling.
    Destructive,
}

/// A user-facing toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

/// Receives navigation requests.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// Receives notifications.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Side effects of a session transition, returned instead of performed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Effects {
    pub notification: Option<Notification>,
    pub navigate: Option<Route>,
}

impl Effects {
    pub fn new(notification: Notification, navigate: Option<Route>) -> Self {
        Self {
            notification: Some(notification),
            navigate,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notification.is_none() && self.navigate.is_none()
    }

    /// Notify first, then navigate.
    pub fn dispatch<N, T>(self, navigator: &mut N, notifier: &mut T)
    where
        N: Navigator + ?Sized,
        T: Notifier + ?Sized,
    {
        if let Some(notification) = self.notification {
            notifier.notify(notification);
        }
        if let Some(route) = self.navigate {
            navigator.navigate(route);
        }
    }

    /// `dispatch` into a single sink that handles both effects.
    pub fn apply<T>(self, sink: &mut T)
    where
        T: Navigator + Notifier + ?Sized,
    {
        if let Some(notification) = self.notification {
            sink.notify(notification);
        }
        if let Some(route) = self.navigate {
            sink.navigate(route);
        }
    }
}
