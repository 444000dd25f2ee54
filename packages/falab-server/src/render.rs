use std::{process::Stdio, time::Duration};

use falab_lib::{config::RenderConfig, error::FaError};
use rand::{distr::Alphanumeric, Rng};
use regex::Regex;
use tokio::{io::AsyncWriteExt, process::Command, time::timeout};

pub struct Rendered {
    pub tex: String,
    pub svg: String,
}

/// Runs the DOT to TikZ to PDF to SVG pipeline. Every stage is an external
/// tool bounded by the configured wall-clock timeout; a stage that exceeds
/// it is killed and surfaces as `OperationFailed`.
pub async fn render(dot: &str, config: &RenderConfig) -> Result<Rendered, FaError> {
    let tex = dot_to_tex(dot, config).await?;
    let tex = fix_pipe_symbols(&tex);
    let svg = tex_to_svg(&tex, config).await?;

    Ok(Rendered { tex, svg })
}

/// Random identifier for a render artifact or scratch directory.
pub fn fresh_id() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

async fn dot_to_tex(dot: &str, config: &RenderConfig) -> Result<String, FaError> {
    let mut child = Command::new("dot2tex")
        .args(["--crop", "-ftikz"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| FaError::OperationFailed(format!("spawning dot2tex: {}", e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(dot.as_bytes())
            .await
            .map_err(|e| FaError::OperationFailed(format!("piping into dot2tex: {}", e)))?;
    }

    let output = timeout(*config.get_dot2tex_timeout(), child.wait_with_output())
        .await
        .map_err(|_| FaError::OperationFailed("dot2tex timed out".to_string()))?
        .map_err(|e| FaError::OperationFailed(format!("dot2tex: {}", e)))?;

    if !output.status.success() {
        return Err(FaError::OperationFailed(format!(
            "dot2tex failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| FaError::OperationFailed(format!("dot2tex output: {}", e)))
}

async fn tex_to_svg(tex: &str, config: &RenderConfig) -> Result<String, FaError> {
    let tex = if tex.contains("\\documentclass") {
        tex.to_string()
    } else {
        format!(
            "\\documentclass[border=10pt]{{standalone}}\n\
             \\usepackage{{tikz}}\n\
             \\usetikzlibrary{{arrows,automata,positioning}}\n\
             \\begin{{document}}\n{}\n\\end{{document}}",
            tex
        )
    };

    let work_dir = std::path::Path::new(config.get_work_dir()).join(fresh_id());
    tokio::fs::create_dir_all(&work_dir)
        .await
        .map_err(|e| FaError::OperationFailed(format!("creating work dir: {}", e)))?;

    let tex_file = work_dir.join("input.tex");
    tokio::fs::write(&tex_file, &tex)
        .await
        .map_err(|e| FaError::OperationFailed(format!("writing tex: {}", e)))?;

    run_tool(
        Command::new("pdflatex")
            .args(["-interaction=nonstopmode", "-halt-on-error", "-output-directory"])
            .arg(&work_dir)
            .arg(&tex_file),
        *config.get_latex_timeout(),
        "pdflatex",
    )
    .await?;

    let svg_file = work_dir.join("output.svg");
    run_tool(
        Command::new("pdf2svg")
            .arg(work_dir.join("input.pdf"))
            .arg(&svg_file),
        *config.get_latex_timeout(),
        "pdf2svg",
    )
    .await?;

    let svg = tokio::fs::read_to_string(&svg_file)
        .await
        .map_err(|e| FaError::OperationFailed(format!("reading svg: {}", e)))?;

    // scratch space; removal failures are not fatal
    let _ = tokio::fs::remove_dir_all(&work_dir).await;

    Ok(svg)
}

async fn run_tool(command: &mut Command, limit: Duration, name: &str) -> Result<(), FaError> {
    let child = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| FaError::OperationFailed(format!("spawning {}: {}", name, e)))?;

    let output = timeout(limit, child.wait_with_output())
        .await
        .map_err(|_| FaError::OperationFailed(format!("{} timed out", name)))?
        .map_err(|e| FaError::OperationFailed(format!("{}: {}", name, e)))?;

    if !output.status.success() {
        return Err(FaError::OperationFailed(format!(
            "{} failed: {}",
            name,
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    Ok(())
}

/// TikZ post-processing: node identifiers in parentheses lose their pipe
/// separators, labels in braces keep them as math-mode `$|$`, and the `@e`
/// and `@t` sentinels become their mathematical glyphs.
pub fn fix_pipe_symbols(tex: &str) -> String {
    let node_id = Regex::new(r"\(([^)]*\|[^)]*)\)").unwrap();
    let node_label = Regex::new(r"\{([^}]*\|[^}]*)\}").unwrap();
    let math_label = Regex::new(r"\{[^}]*@.[^}]*\}").unwrap();

    let tex = node_id.replace_all(tex, |caps: &regex::Captures| {
        format!("({})", caps[1].replace('|', ""))
    });
    let tex = node_label.replace_all(&tex, |caps: &regex::Captures| {
        format!("{{{}}}", caps[1].replace('|', "$|$"))
    });
    let tex = math_label.replace_all(&tex, |caps: &regex::Captures| {
        caps[0].replace("@e", "$\\varepsilon$")
    });
    let tex = math_label.replace_all(&tex, |caps: &regex::Captures| {
        caps[0].replace("@t", "$\\emptyset$")
    });

    tex.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipes_in_node_identifiers_are_concatenated() {
        assert_eq!(fix_pipe_symbols("\\node (q0|q1) at"), "\\node (q0q1) at");
    }

    #[test]
    fn pipes_in_labels_become_math_mode() {
        assert_eq!(fix_pipe_symbols("{q0|q1}"), "{q0$|$q1}");
    }

    #[test]
    fn sentinels_become_glyphs_inside_labels() {
        assert_eq!(fix_pipe_symbols("{@e}"), "{$\\varepsilon$}");
        assert_eq!(fix_pipe_symbols("{@t}"), "{$\\emptyset$}");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(fix_pipe_symbols("\\draw (a) -- (b);"), "\\draw (a) -- (b);");
    }

    #[test]
    fn fresh_ids_are_filename_safe() {
        let id = fresh_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
