/// Expands to the identity and type-erasure methods of [`Packet`](crate::Packet)
/// for a type with `NAME` and `HASH` associated constants.
///
/// Used inside an `impl Packet for T` block.
#[macro_export]
macro_rules! packet_identity {
    () => {
        fn packet_name(&self) -> &'static str {
            Self::NAME
        }

        fn packet_hash(&self) -> $crate::PacketHash {
            Self::HASH
        }

        fn clone_packet(&self) -> ::std::boxed::Box<dyn $crate::Packet> {
            ::std::boxed::Box::new(::std::clone::Clone::clone(self))
        }

        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
            self
        }
    };
}

/// Implements `Display` for packet types by delegating to `dyn Packet`.
#[macro_export]
macro_rules! impl_packet_display {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ::std::fmt::Display for $ty {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    ::std::fmt::Display::fmt(self as &dyn $crate::Packet, f)
                }
            }
        )+
    };
}
