use anyhow::{anyhow, Context};
use clap::Parser;
use lightweb::codec;
use lightweb::config::Config;
use lightweb::http::cookie::Cookie;
use lightweb::{record, Endpoint, Method, Response, Server, Status};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Default, Clone, PartialEq)]
struct Person {
    name: String,
    age: i32,
}

record!(Person { name, age });

fn main() -> anyhow::Result<()> {
    lightweb::init_tracing();
    let config = Config::parse();

    let mut server = Server::from_tcp_addr(&config.bind, config.workers.get())?;

    server
        .add_endpoint(
            Endpoint::builder("/helloworld")
                .method(Method::GET)
                .respond(|_, _| Ok(Response::plain(Status::OK, "You got it!"))),
        )
        .add_endpoint(
            Endpoint::builder("/helloworld")
                .method(Method::POST)
                .param("id")
                .respond(|ctx, args| {
                    ctx.set_cookie(Cookie::new("last_id", args.get(0)?).path("/"));
                    Ok(Response::plain(
                        Status::OK,
                        "You will only see this when you post",
                    ))
                }),
        )
        .add_endpoint(Endpoint::builder("/person").returns(|_, _| {
            Ok(Person {
                name: "John Doe".to_string(),
                age: 31,
            })
        }))
        .add_endpoint(
            Endpoint::builder("/person/decode")
                .method(Method::POST)
                .param("person")
                .returns(|_, args| {
                    let person: Person = codec::from_json(args.named("person")?)
                        .context("person is not a valid document")?;
                    Ok(format!("{} is {} years old", person.name, person.age))
                }),
        )
        .add_endpoint(
            Endpoint::builder("/home")
                .respond(|_, _| Ok(Response::redirect("/helloworld"))),
        );

    if let Some(dir) = config.directory {
        server.add_endpoint(
            Endpoint::builder("/download")
                .method(Method::GET)
                .param("name")
                .respond(move |_, args| Ok(Response::download(resolve_file(&dir, args.get(0)?)?))),
        );
    }

    server.run()
}

/// Joins `name` onto `dir`, refusing anything that would leave it.
fn resolve_file(dir: &Path, name: &str) -> anyhow::Result<PathBuf> {
    let relative = Path::new(name);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(anyhow!("Invalid file name {}", name));
    }
    Ok(dir.join(relative))
}
