//! Procedural macros for the handoff runtime.
//!
//! Re-exported by the `handoff` crate; depend on `handoff` rather than on
//! this crate directly.

mod utils;

use proc_macro::TokenStream;
use utils::RuntimeArgs;

/// Awaits several futures concurrently and returns their outputs as a
/// tuple, in argument order.
///
/// ```rust,ignore
/// let (a, b) = handoff::join!(channel.send(1), channel.receive());
/// ```
#[proc_macro]
pub fn join(input: TokenStream) -> TokenStream {
    let futures: Vec<String> = utils::split_args(input)
        .iter()
        .map(|tokens| utils::to_source(tokens))
        .collect();

    match futures.as_slice() {
        [] => return utils::emit("()", "join!"),
        [single] => return utils::emit(&format!("({single}).await"), "join!"),
        _ => {}
    }

    let mut out = String::from("{\n");

    for (i, future) in futures.iter().enumerate() {
        out.push_str(&format!(
            "let mut __join_future_{i} = ::std::boxed::Box::pin({future});\n\
             let mut __join_output_{i} = ::core::option::Option::None;\n"
        ));
    }

    out.push_str(
        "::std::future::poll_fn(move |cx| {\n\
             use ::std::future::Future as _;\n\
             let mut pending = false;\n",
    );

    for i in 0..futures.len() {
        out.push_str(&format!(
            "if __join_output_{i}.is_none() {{\n\
                 match __join_future_{i}.as_mut().poll(cx) {{\n\
                     ::std::task::Poll::Ready(value) => __join_output_{i} = ::core::option::Option::Some(value),\n\
                     ::std::task::Poll::Pending => pending = true,\n\
                 }}\n\
             }}\n"
        ));
    }

    out.push_str("if pending { return ::std::task::Poll::Pending; }\n");
    out.push_str("::std::task::Poll::Ready((\n");

    for i in 0..futures.len() {
        out.push_str(&format!(
            "match __join_output_{i}.take() {{ ::core::option::Option::Some(value) => value, ::core::option::Option::None => ::core::unreachable!() }},\n"
        ));
    }

    out.push_str("))\n}).await\n}\n");

    utils::emit(&out, "join!")
}

/// Waits for the first of several futures and runs its handler.
///
/// Every branch has the form `future => handler`, where `handler` is
/// called with the future's output. The futures of the other branches are
/// dropped before the handler runs, which cancels them. Branches are polled
/// in order, so the first branch wins when several are ready at once.
///
/// ```rust,ignore
/// handoff::select! {
///     channel.receive() => |value| println!("received {value:?}"),
///     sleep(Duration::from_millis(50)) => |_| println!("timed out"),
/// }
/// ```
#[proc_macro]
pub fn select(input: TokenStream) -> TokenStream {
    let branches = match utils::parse_select_branches(input) {
        Ok(branches) if branches.is_empty() => {
            return utils::compile_error("select! requires at least one branch");
        }
        Ok(branches) => branches,
        Err(message) => return utils::compile_error(&message),
    };

    let generics = (0..branches.len())
        .map(|i| format!("__T{i}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::from("{\n");

    out.push_str(&format!("enum __Selected<{generics}> {{\n"));
    for i in 0..branches.len() {
        out.push_str(&format!("__Branch{i}(__T{i}),\n"));
    }
    out.push_str("}\n");

    for (i, branch) in branches.iter().enumerate() {
        out.push_str(&format!(
            "let mut __select_future_{i} = ::std::boxed::Box::pin({});\n",
            branch.future
        ));
    }

    // The closure owns the futures: they are all dropped once it resolves.
    out.push_str(
        "let __selected = ::std::future::poll_fn(move |cx| {\n\
             use ::std::future::Future as _;\n",
    );

    for i in 0..branches.len() {
        out.push_str(&format!(
            "if let ::std::task::Poll::Ready(value) = __select_future_{i}.as_mut().poll(cx) {{\n\
                 return ::std::task::Poll::Ready(__Selected::__Branch{i}(value));\n\
             }}\n"
        ));
    }

    out.push_str("::std::task::Poll::Pending\n}).await;\n");
    out.push_str("match __selected {\n");

    for (i, branch) in branches.iter().enumerate() {
        out.push_str(&format!(
            "__Selected::__Branch{i}(value) => ({})(value),\n",
            branch.handler
        ));
    }

    out.push_str("}\n}\n");

    utils::emit(&out, "select!")
}

/// Runs an `async fn main` on a handoff runtime.
///
/// Accepts `worker_threads = N`; the default is one worker per logical
/// CPU.
///
/// ```rust,ignore
/// #[handoff::main(worker_threads = 2)]
/// async fn main() {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let wrapped = RuntimeArgs::parse(attr).and_then(|args| utils::wrap_in_runtime(item, &args));

    match wrapped {
        Ok(tokens) => tokens.into_iter().collect(),
        Err(message) => utils::compile_error(&message),
    }
}

/// Runs an `async fn` test on its own handoff runtime.
///
/// Accepts the same options as [`main`](macro@main). The test may return a
/// `Result`.
///
/// ```rust,ignore
/// #[handoff::test(worker_threads = 1)]
/// async fn receives_in_order() {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let wrapped = RuntimeArgs::parse(attr).and_then(|args| utils::wrap_in_runtime(item, &args));

    match wrapped {
        Ok(tokens) => {
            let mut output: TokenStream = "#[::core::prelude::v1::test]"
                .parse()
                .unwrap_or_default();
            output.extend(tokens);
            output
        }
        Err(message) => utils::compile_error(&message),
    }
}
