use resource_router::dispatch::{Dispatcher, HttpError, Methods, Params, Resource, Subject};
use resource_router::{route_table, BoxError};

use std::convert::Infallible as Never;

use hyper::service::make_service_fn;

#[derive(Default)]
struct Hello {
    name: String,
}

impl Resource for Hello {
    fn methods(methods: &mut Methods<Self>) {
        methods.get(|_: &mut Hello| Ok::<_, HttpError>(()));
    }

    fn init(&mut self, mut params: Params) -> Result<(), BoxError> {
        self.name = params.take("name").unwrap_or_default();
        Ok(())
    }
}

#[derive(Default)]
struct File {
    path: String,
}

impl Resource for File {
    fn methods(methods: &mut Methods<Self>) {
        methods.get(|f: &mut File| {
            if f.path.contains("..") {
                return Err(HttpError::client(hyper::StatusCode::FORBIDDEN));
            }
            Ok(())
        });
    }

    fn init(&mut self, mut params: Params) -> Result<(), BoxError> {
        self.path = params.take("rest").unwrap_or_default();
        Ok(())
    }
}

fn render(subject: &Subject<'_>) -> Result<Vec<u8>, BoxError> {
    if let Some(e) = subject.error() {
        return Ok(e.to_string().into_bytes());
    }
    if let Some(hello) = subject.downcast_ref::<Hello>() {
        return Ok(format!("hello, {}!", hello.name).into_bytes());
    }
    if let Some(file) = subject.downcast_ref::<File>() {
        return Ok(format!("access file: {}", file.path).into_bytes());
    }
    Err("no view for resource".into())
}

#[tokio::main(basic_scheduler)]
async fn main() {
    let table = route_table! {
        "/hello/:name" => Hello,
        @ "/api/v1" => {
            "/file/*" => File,
        },
    };

    let service = Dispatcher::builder(table)
        .renderer(render)
        .build()
        .into_service();

    let make = make_service_fn(move |_| {
        let service = service.clone();
        async move { Ok::<_, Never>(service) }
    });

    let addr = "127.0.0.1:3000";

    let server = hyper::Server::bind(&addr.parse().unwrap()).serve(make);

    println!("Server is listening on: http://{}", addr);
    println!("hello: http://{}/hello/world", addr);
    println!("api: http://{}/api/v1/file/path/to/public/file", addr);
    println!("404: http://{}/other/path", addr);
    println!();

    server.await.unwrap();
}
