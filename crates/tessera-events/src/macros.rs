// ABOUTME: Declarative macro for defining the event kinds of one namespace
// ABOUTME: Checks namespace classification at compile time

/// Declare the event kinds of a namespace.
///
/// ```
/// mod tools_panel {
///     tessera_events::declare_events! {
///         namespace = "tools_panel", directed;
///         /// Open the panel
///         Open(());
///         /// Ask which tool is highlighted
///         FetchHighlighted(()) => Option<String>;
///     }
/// }
///
/// use tessera_events::{Delivery, EventKind};
/// assert_eq!(<tools_panel::Open as EventKind>::DELIVERY, Delivery::Directed);
/// assert_eq!(tools_panel::KINDS.len(), 2);
/// ```
///
/// Broadcast namespaces cannot declare a response type; the build fails if a
/// namespace is declared with a delivery its name does not classify to.
#[macro_export]
macro_rules! declare_events {
    (
        namespace = $ns:literal, broadcast;
        $( $(#[$meta:meta])* $kind:ident ( $payload:ty ); )*
    ) => {
        const _: () = assert!(
            !$crate::Delivery::classify($ns).is_directed(),
            concat!("namespace `", $ns, "` is not a broadcast namespace")
        );

        $( $crate::declare_events!(@kind $ns, $(#[$meta])* $kind, $payload, ()); )*

        /// Every kind declared in this namespace
        pub const KINDS: &[$crate::KindDescriptor] = &[
            $( <$kind as $crate::EventKind>::DESCRIPTOR, )*
        ];
    };

    (
        namespace = $ns:literal, directed;
        $( $(#[$meta:meta])* $kind:ident ( $payload:ty ) $(=> $response:ty)?; )*
    ) => {
        const _: () = assert!(
            $crate::Delivery::classify($ns).is_directed(),
            concat!("namespace `", $ns, "` is not a directed namespace")
        );

        $(
            $crate::declare_events!(
                @kind $ns, $(#[$meta])* $kind, $payload,
                $crate::declare_events!(@response $($response)?)
            );
        )*

        /// Every kind declared in this namespace
        pub const KINDS: &[$crate::KindDescriptor] = &[
            $( <$kind as $crate::EventKind>::DESCRIPTOR, )*
        ];
    };

    (@response) => { () };
    (@response $response:ty) => { $response };

    (@kind $ns:literal, $(#[$meta:meta])* $kind:ident, $payload:ty, $response:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $kind;

        impl $crate::EventKind for $kind {
            type Payload = $payload;
            type Response = $response;

            const NAMESPACE: &'static str = $ns;
            const NAME: &'static str = stringify!($kind);
        }
    };
}
