use crate::commands::Out;
use crate::model::Task;
use crate::todo::{self, JsonFile, TodoStore};
use crate::Result;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

pub async fn todo_add(file: &Path, text: &str) -> Result<Out<Task>> {
    let text = text.trim();
    anyhow::ensure!(!text.is_empty(), "The task text is empty");
    let mut store = TodoStore::open(JsonFile::new(file)).await?;
    let task = store.add(text).await?;
    Ok(Out::new(
        format!("Added task {}: {}", task.id(), task.text()),
        task,
    ))
}

/// Completes task `id`. An unknown id is reported in the message, not as an error.
pub async fn todo_complete(file: &Path, id: u32) -> Result<Out<Task>> {
    let mut store = TodoStore::open(JsonFile::new(file)).await?;
    Ok(match store.complete(id).await? {
        Some(task) => Out::new(
            format!("Completed task {}: {}", task.id(), task.text()),
            task,
        ),
        None => format!("There is no task with id {id}").into(),
    })
}

pub async fn todo_list(file: &Path) -> Result<Out<Vec<Task>>> {
    let store = TodoStore::open(JsonFile::new(file)).await?;
    let tasks = store.tasks().to_vec();
    if tasks.is_empty() {
        return Ok(Out::new("No hay tareas.", tasks));
    }
    let lines: Vec<String> = tasks
        .iter()
        .map(|task| {
            let mark = if task.completed() { "x" } else { " " };
            format!("  [{mark}] {:>3}. {}", task.id(), task.text())
        })
        .collect();
    Ok(Out::new(format!("Tareas:\n{}", lines.join("\n")), tasks))
}

/// Serves the web app on `127.0.0.1:<port>` until the process is stopped.
pub async fn todo_serve(file: &Path, port: u16) -> Result<Out<()>> {
    let store = TodoStore::open(JsonFile::new(file)).await?;
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    todo::serve(store, addr).await?;
    Ok("The to-do web app has stopped".into())
}
