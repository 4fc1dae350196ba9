//! Overlay rendering and final compositing.
//!
//! Word overlays are rasterized by pointing a headless browser at a small
//! generated HTML page, one per word; the compositor then trims each
//! background clip to its planned segment, chains them, overlays the word
//! images at their absolute times and muxes the combined recitation audio.

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::timeline::{Timeline, WordRecord};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{debug, info};

/// A rendered word overlay with its display window on the timeline clock
#[derive(Debug, Clone)]
pub struct OverlayImage {
    pub path: PathBuf,
    pub start_time: f64,
    pub end_time: f64,
}

/// A downloaded background clip assigned to a planned segment
#[derive(Debug, Clone)]
pub struct SegmentClip {
    pub path: PathBuf,
    pub start_time: f64,
    pub end_time: f64,
}

/// Renders word text overlays with a headless browser
pub struct OverlayRenderer {
    config: RenderConfig,
}

impl OverlayRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render one overlay PNG per timeline word
    pub async fn render_all(&self, timeline: &Timeline) -> Result<Vec<OverlayImage>> {
        tokio::fs::create_dir_all(&self.config.overlay_dir).await?;

        let mut overlays = Vec::with_capacity(timeline.len());
        for (index, record) in timeline.words().iter().enumerate() {
            let path = self.render_word(record, index).await?;
            overlays.push(OverlayImage {
                path,
                start_time: record.start_time,
                end_time: record.end_time,
            });
        }
        info!("🖼️ Rendered {} word overlay(s)", overlays.len());
        Ok(overlays)
    }

    /// Rasterize a single word overlay
    pub async fn render_word(&self, record: &WordRecord, index: usize) -> Result<PathBuf> {
        let html_path = self.config.overlay_dir.join(format!("overlay_{:04}.html", index));
        let png_path = self.config.overlay_dir.join(format!("overlay_{:04}.png", index));
        tokio::fs::write(&html_path, self.overlay_html(record)).await?;

        debug!("Rendering overlay for '{}' ({})", record.text, index);

        let window_size = format!("--window-size={},{}", self.config.width, self.config.height);
        let screenshot = format!("--screenshot={}", png_path.display());

        // Browser chatter is captured, not inherited, so it cannot pollute
        // the tool's own output
        let output = tokio::process::Command::new(&self.config.browser_path)
            .args([
                "--headless",
                "--disable-gpu",
                "--default-background-color=00000000",
                window_size.as_str(),
                screenshot.as_str(),
            ])
            .arg(&html_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::External(format!(
                "overlay rendering failed for word '{}': {}",
                record.text,
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(png_path)
    }

    /// HTML snippet for one word overlay: verse text above its translation,
    /// centered on a transparent canvas
    fn overlay_html(&self, record: &WordRecord) -> String {
        let (r, g, b) = self.config.text_color;
        let translation = record.translation.as_deref().unwrap_or("");
        format!(
            r#"<!DOCTYPE html>
<html><head><style>
@font-face {{
    font-family: verse;
    src: url({font});
}}
.text {{
    font-family: verse;
    font-size: {size}px;
    color: rgb({r}, {g}, {b});
    margin: 0;
}}
.translation {{
    font-size: {translation_size}px;
    color: rgb({r}, {g}, {b});
    margin: 1px;
}}
div {{
    display: flex;
    justify-content: center;
    align-items: center;
    height: {height}px;
    width: {width}px;
    flex-direction: column;
}}
</style></head>
<body><div><p class="text">{word}</p><p class="translation">{translation}</p></div></body></html>
"#,
            font = self.config.font_file.display(),
            size = self.config.font_size,
            translation_size = self.config.font_size * 3 / 10,
            r = r,
            g = g,
            b = b,
            height = self.config.height,
            width = self.config.width,
            word = record.text,
            translation = translation,
        )
    }
}

/// Composites background clips, overlays and audio into the final video
pub struct VideoCompositor {
    config: RenderConfig,
}

impl VideoCompositor {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render the final video. Clips must tile the timeline span in order;
    /// overlays carry absolute display windows.
    pub async fn compose(
        &self,
        clips: &[SegmentClip],
        overlays: &[OverlayImage],
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        if clips.is_empty() {
            return Err(Error::External("no background clips to composite".to_string()));
        }
        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let filter = build_filter_graph(clips, overlays, self.config.width, self.config.height);

        let mut command = tokio::process::Command::new("ffmpeg");
        for clip in clips {
            // Loop short clips so trim always has enough frames
            command.args(["-stream_loop", "-1", "-i"]).arg(&clip.path);
        }
        for overlay in overlays {
            command.args(["-loop", "1", "-i"]).arg(&overlay.path);
        }
        command.arg("-i").arg(audio_path);

        let audio_input = clips.len() + overlays.len();
        command
            .args(["-filter_complex", &filter, "-map", "[vout]", "-map"])
            .arg(format!("{}:a", audio_input))
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-shortest", "-y"])
            .arg(output_path);

        info!("🎞️ Compositing {} clip(s) and {} overlay(s)", clips.len(), overlays.len());
        let output = command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::External(format!(
                "video compositing failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        info!("✅ Wrote {}", output_path.display());
        Ok(())
    }
}

/// ffmpeg filter graph: trim and scale each clip, chain them, then stack
/// time-windowed overlays on top
fn build_filter_graph(
    clips: &[SegmentClip],
    overlays: &[OverlayImage],
    width: u32,
    height: u32,
) -> String {
    let mut parts = Vec::new();

    for (i, clip) in clips.iter().enumerate() {
        parts.push(format!(
            "[{i}:v]trim=duration={duration:.3},scale={width}:{height},setsar=1,setpts=PTS-STARTPTS[clip{i}]",
            i = i,
            duration = clip.end_time - clip.start_time,
            width = width,
            height = height,
        ));
    }

    let chain: String = (0..clips.len()).map(|i| format!("[clip{}]", i)).collect();
    parts.push(format!(
        "{}concat=n={}:v=1:a=0[base0]",
        chain,
        clips.len()
    ));

    for (j, overlay) in overlays.iter().enumerate() {
        let input = clips.len() + j;
        let out = if j + 1 == overlays.len() {
            "[vout]".to_string()
        } else {
            format!("[base{}]", j + 1)
        };
        parts.push(format!(
            "[base{j}][{input}:v]overlay=(W-w)/2:(H-h)/2:enable='between(t,{start:.3},{end:.3})'{out}",
            j = j,
            input = input,
            start = overlay.start_time,
            end = overlay.end_time,
            out = out,
        ));
    }

    if overlays.is_empty() {
        // No overlays: the concatenated base is the output
        parts.push("[base0]null[vout]".to_string());
    }

    parts.join(";")
}
