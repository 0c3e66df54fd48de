use aurora_common::Game;
use aurora_mdl::{Model, NodeId, NodeTree};
use clap::Args;
use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use std::{
    fs::File,
    io::{BufReader, Cursor},
    path::PathBuf,
};
use tracing::debug;

#[derive(Args)]
pub struct ModelArgs {
    /// An input MDL file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// The vertex data, defaults to the MDX file next to the model
    #[arg(long, value_name = "FILE")]
    mdx: Option<PathBuf>,

    /// The game the model was built for
    #[arg(short, long, default_value_t = Game::Kotor)]
    game: Game,

    /// Also list the animations and their events
    #[arg(short, long, default_value_t = false)]
    animations: bool,
}

fn depth(tree: &NodeTree, id: NodeId) -> usize {
    std::iter::successors(tree.get(id).and_then(|n| n.parent), |&p| {
        tree.get(p).and_then(|n| n.parent)
    })
    .count()
}

impl ModelArgs {
    fn mdx(&self) -> Result<Vec<u8>> {
        let path = self
            .mdx
            .clone()
            .unwrap_or_else(|| self.file.with_extension("mdx"));
        if self.mdx.is_none() && !path.exists() {
            debug!("no vertex data at {}", path.display());
            return Ok(Vec::new());
        }
        std::fs::read(&path)
            .into_diagnostic()
            .context(format!("path: {}", path.display()))
    }

    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let model = Model::read(BufReader::new(f), Cursor::new(self.mdx()?), self.game)?;

        println!("{}", model.name.bold());
        if let Some(super_model) = &model.super_model {
            println!("supermodel: {super_model}");
        }
        println!("classification: {:?}", model.classification);
        println!(
            "bounds: {} .. {}, radius {}, scale {}",
            model.bounds_min, model.bounds_max, model.radius, model.scale
        );

        println!("{} nodes", model.nodes.len());
        for (id, node) in model.nodes.iter() {
            let indent = "  ".repeat(depth(&model.nodes, id) + 1);
            let mut line = format!("{indent}{} {}", id.dimmed(), node.name);
            if let Some(mesh) = node.mesh() {
                line.push_str(&format!(
                    " ({} vertices, {} faces)",
                    mesh.vertices.len(),
                    mesh.faces.len()
                ));
                let textures = [mesh.diffuse_map(), mesh.lightmap()]
                    .into_iter()
                    .flatten()
                    .join(", ");
                if !textures.is_empty() {
                    line.push_str(&format!(" [{}]", textures.blue()));
                }
            }
            if node.light().is_some() {
                line.push_str(" (light)");
            }
            println!("{line}");
        }

        if self.animations {
            for animation in &model.animations {
                println!(
                    "{} {}s, transition {}s, root {}",
                    animation.name.bold(),
                    animation.length,
                    animation.transition,
                    animation.anim_root
                );
                for event in &animation.events {
                    println!("  {:>6.3} {}", event.time, event.name);
                }
            }
        } else {
            println!("{} animations", model.animations.len());
        }
        Ok(())
    }
}
