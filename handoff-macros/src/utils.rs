use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Splits a `TokenStream` on top-level commas.
///
/// Commas inside delimited groups (`()`, `[]`, `{}`) belong to a single
/// token and are kept. Commas inside generic arguments are not recognised,
/// so turbofish types with several parameters must be parenthesized.
pub(crate) fn split_args(input: TokenStream) -> Vec<Vec<TokenTree>> {
    let mut args = Vec::new();
    let mut current = Vec::new();

    for token in input {
        match &token {
            TokenTree::Punct(p) if p.as_char() == ',' => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Renders tokens back into Rust source.
pub(crate) fn to_source(tokens: &[TokenTree]) -> String {
    tokens.iter().cloned().collect::<TokenStream>().to_string()
}

/// Position of the `=>` separating the future from the handler.
fn arrow_position(tokens: &[TokenTree]) -> Option<usize> {
    tokens.windows(2).position(|pair| {
        matches!(
            pair,
            [TokenTree::Punct(eq), TokenTree::Punct(gt)]
                if eq.as_char() == '=' && gt.as_char() == '>'
        )
    })
}

/// A `future => handler` branch of `select!`, as Rust source.
pub(crate) struct SelectBranch {
    pub(crate) future: String,
    pub(crate) handler: String,
}

/// Parses the comma-separated branches of `select!`.
pub(crate) fn parse_select_branches(input: TokenStream) -> Result<Vec<SelectBranch>, String> {
    split_args(input)
        .into_iter()
        .enumerate()
        .map(|(i, tokens)| {
            let arrow = arrow_position(&tokens)
                .ok_or_else(|| format!("select! branch {} is missing `=>`", i + 1))?;

            let future = to_source(&tokens[..arrow]);
            let handler = to_source(&tokens[arrow + 2..]);

            if future.trim().is_empty() || handler.trim().is_empty() {
                return Err(format!("select! branch {} must be `future => handler`", i + 1));
            }

            Ok(SelectBranch { future, handler })
        })
        .collect()
}

/// Options accepted by `#[handoff::main]` and `#[handoff::test]`.
#[derive(Default)]
pub(crate) struct RuntimeArgs {
    pub(crate) worker_threads: Option<usize>,
}

impl RuntimeArgs {
    /// Parses `worker_threads = N`.
    pub(crate) fn parse(attr: TokenStream) -> Result<Self, String> {
        let mut args = RuntimeArgs::default();

        for tokens in split_args(attr) {
            let source = to_source(&tokens);
            let Some((key, value)) = source.split_once('=') else {
                return Err(format!("expected `key = value`, found `{source}`"));
            };

            match key.trim() {
                "worker_threads" => {
                    let value = value.trim();
                    let threads = value
                        .parse::<usize>()
                        .ok()
                        .filter(|&n| n > 0)
                        .ok_or_else(|| {
                            format!("`worker_threads` must be a positive integer, found `{value}`")
                        })?;

                    args.worker_threads = Some(threads);
                }
                other => return Err(format!("unknown runtime option `{other}`")),
            }
        }

        Ok(args)
    }

    /// Source of the expression building the runtime.
    pub(crate) fn builder(&self) -> String {
        let mut builder = String::from("::handoff::RuntimeBuilder::new()");

        if let Some(n) = self.worker_threads {
            builder.push_str(&format!(".worker_threads({n})"));
        }

        builder.push_str(".build()");
        builder
    }
}

/// Rewrites `async fn name() { body }` into a synchronous function whose
/// body runs `body` on a fresh runtime.
pub(crate) fn wrap_in_runtime(item: TokenStream, args: &RuntimeArgs) -> Result<Vec<TokenTree>, String> {
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    let async_pos = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
        .ok_or("the function must be declared `async`")?;
    tokens.remove(async_pos);

    let body_pos = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
        .ok_or("expected a function body")?;

    let TokenTree::Group(body) = &tokens[body_pos] else {
        return Err("expected a function body".to_owned());
    };

    let source = format!(
        "{{
            let runtime = {builder};
            runtime.block_on(async move {{ {body} }})
        }}",
        builder = args.builder(),
        body = body.stream(),
    );

    let stream = source.parse::<TokenStream>().map_err(|err| err.to_string())?;
    tokens[body_pos] = TokenTree::Group(Group::new(Delimiter::Brace, stream));

    Ok(tokens)
}

/// Parses generated source, reporting failures as a compile error.
pub(crate) fn emit(source: &str, name: &str) -> TokenStream {
    source
        .parse()
        .unwrap_or_else(|err| compile_error(&format!("{name}: {err}")))
}

/// A `compile_error!` invocation carrying `message`.
pub(crate) fn compile_error(message: &str) -> TokenStream {
    format!("::core::compile_error!({message:?});")
        .parse()
        .unwrap_or_default()
}
