/// Builds a [`RouteTable`](crate::RouteTable).
///
/// ```
/// use resource_router::{route_table, Methods, Resource};
///
/// #[derive(Default)]
/// struct Home;
/// impl Resource for Home {
///     fn methods(_: &mut Methods<Self>) {}
/// }
///
/// #[derive(Default)]
/// struct Post;
/// impl Resource for Post {
///     fn methods(_: &mut Methods<Self>) {}
/// }
///
/// let table = route_table! {
///     "/" => Home,
///     @ "/blog" => {
///         "/:slug" => Post,
///     },
/// };
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.link::<Post, _>(&["hello"]).unwrap(), "/blog/hello");
/// ```
#[macro_export]
macro_rules! route_table {
    {@entries $table:ident;} => {};

    {@entries $table:ident; @ $prefix:expr => { $($sub:tt)* } $(, $($rest:tt)*)?} => {
        $table.nest($prefix, |__t| {
            $crate::route_table!(@entries __t; $($sub)*);
        });
        $crate::route_table!(@entries $table; $($($rest)*)?);
    };

    {@entries $table:ident; $pattern:expr => $resource:ty $(, $($rest:tt)*)?} => {
        $table.insert::<$resource>($pattern);
        $crate::route_table!(@entries $table; $($($rest)*)?);
    };

    {$($entries:tt)*} => {{
        let mut __table = $crate::dispatch::RouteTable::new();
        $crate::route_table!(@entries __table; $($entries)*);
        __table
    }};
}
