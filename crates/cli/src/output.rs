//! CLI output formatting module

use clap::ValueEnum;
use growthfy_core::{Post, Profile, Result, Trend, TrendLocation};
use serde::Serialize;
use std::io::{self, Write};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Writes command results to stdout or a custom writer
pub struct OutputFormatter<'a> {
    format: OutputFormat,
    writer: Box<dyn Write + Send + 'a>,
}

impl OutputFormatter<'static> {
    /// Formatter writing to stdout
    pub fn stdout(format: OutputFormat) -> Self {
        Self::with_writer(format, io::stdout())
    }
}

impl<'a> OutputFormatter<'a> {
    /// Create a formatter with custom writer
    pub fn with_writer<W: Write + Send + 'a>(format: OutputFormat, writer: W) -> Self {
        Self {
            format,
            writer: Box::new(writer),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print any serializable value as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    /// Print a page of posts. In pretty mode reposts show the original
    /// post under a "reposted by" line.
    pub fn posts(&mut self, posts: &[Post]) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(posts);
        }

        if posts.is_empty() {
            writeln!(self.writer, "No posts found")?;
            return Ok(());
        }

        for (i, post) in posts.iter().enumerate() {
            if i > 0 {
                writeln!(self.writer)?;
            }
            if post.is_repost() {
                writeln!(self.writer, "reposted by @{}", post.author.handle)?;
            }
            let shown = post.display_post();
            writeln!(
                self.writer,
                "@{} ({}) {}",
                shown.author.handle, shown.author.display_name, shown.created_at
            )?;
            for line in shown.text.lines() {
                writeln!(self.writer, "  {}", line)?;
            }
            if let Some(quoted) = &shown.quote_of {
                writeln!(self.writer, "  > @{}: {}", quoted.author.handle, quoted.text)?;
            }
            writeln!(
                self.writer,
                "  likes {}  reposts {}  replies {}  quotes {}  [{}]",
                shown.counts.likes,
                shown.counts.reposts,
                shown.counts.replies,
                shown.counts.quotes,
                shown.id
            )?;
        }
        Ok(())
    }

    pub fn profile(&mut self, profile: &Profile) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(profile);
        }

        let badge = if profile.verified { " [verified]" } else { "" };
        writeln!(
            self.writer,
            "{} @{}{}",
            profile.display_name, profile.handle, badge
        )?;
        if let Some(description) = profile.description.as_deref().filter(|d| !d.is_empty()) {
            writeln!(self.writer, "  {}", description)?;
        }
        if let Some(location) = profile.location.as_deref().filter(|l| !l.is_empty()) {
            writeln!(self.writer, "  location: {}", location)?;
        }
        writeln!(
            self.writer,
            "  followers {}  following {}  posts {}",
            profile.followers, profile.following, profile.posts
        )?;
        writeln!(self.writer, "  id: {}", profile.id)?;
        Ok(())
    }

    pub fn trends(&mut self, trends: &[Trend]) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(trends);
        }

        if trends.is_empty() {
            writeln!(self.writer, "No trends available")?;
            return Ok(());
        }
        for (i, trend) in trends.iter().enumerate() {
            match trend.tweet_volume {
                Some(volume) => writeln!(self.writer, "{:>3}. {} ({} posts)", i + 1, trend.name, volume)?,
                None => writeln!(self.writer, "{:>3}. {}", i + 1, trend.name)?,
            }
        }
        Ok(())
    }

    pub fn locations(&mut self, locations: &[TrendLocation]) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(locations);
        }

        for location in locations {
            let country = if location.country.is_empty() {
                String::new()
            } else {
                format!(", {}", location.country)
            };
            writeln!(
                self.writer,
                "{:>10}  {}{}",
                location.woeid, location.name, country
            )?;
        }
        Ok(())
    }

    /// Output a simple message. Suppressed in JSON mode.
    pub fn message(&mut self, msg: &str) -> Result<()> {
        if self.format == OutputFormat::Pretty {
            writeln!(self.writer, "{}", msg)?;
        }
        Ok(())
    }

    /// Output a success message. Suppressed in JSON mode.
    pub fn success(&mut self, msg: &str) -> Result<()> {
        self.message(&format!("✓ {}", msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use growthfy_core::{Author, PostCounts};

    fn post(id: &str, handle: &str, text: &str) -> Post {
        Post {
            id: id.to_string(),
            author: Author {
                handle: handle.to_string(),
                display_name: handle.to_uppercase(),
                ..Default::default()
            },
            text: text.to_string(),
            counts: PostCounts {
                likes: 3,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn render<F>(format: OutputFormat, f: F) -> String
    where
        F: FnOnce(&mut OutputFormatter<'_>) -> Result<()>,
    {
        let mut output = Vec::new();
        {
            let mut formatter = OutputFormatter::with_writer(format, &mut output);
            f(&mut formatter).unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_pretty_posts() {
        let out = render(OutputFormat::Pretty, |fmt| {
            fmt.posts(&[post("1", "rustlang", "Rust 1.80\nis out")])
        });
        assert!(out.contains("@rustlang (RUSTLANG)"));
        assert!(out.contains("  Rust 1.80\n  is out"));
        assert!(out.contains("likes 3"));
        assert!(out.contains("[1]"));
    }

    #[test]
    fn test_pretty_repost_shows_original() {
        let mut repost = post("2", "fan", "RT @rustlang: Rust 1.80");
        repost.repost_of = Some(Box::new(post("1", "rustlang", "Rust 1.80")));

        let out = render(OutputFormat::Pretty, |fmt| fmt.posts(&[repost]));
        assert!(out.starts_with("reposted by @fan\n@rustlang"));
        assert!(out.contains("[1]"));
    }

    #[test]
    fn test_json_posts() {
        let out = render(OutputFormat::Json, |fmt| {
            fmt.posts(&[post("1", "rustlang", "hello")])
        });
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["id"], "1");
        assert_eq!(value[0]["author"]["handle"], "rustlang");
    }

    #[test]
    fn test_empty_posts() {
        let out = render(OutputFormat::Pretty, |fmt| fmt.posts(&[]));
        assert_eq!(out, "No posts found\n");
    }

    #[test]
    fn test_trends() {
        let trends = vec![
            Trend {
                name: "#rustlang".to_string(),
                tweet_volume: Some(1200),
                ..Default::default()
            },
            Trend {
                name: "Ferris".to_string(),
                ..Default::default()
            },
        ];
        let out = render(OutputFormat::Pretty, |fmt| fmt.trends(&trends));
        assert!(out.contains("  1. #rustlang (1200 posts)"));
        assert!(out.contains("  2. Ferris\n"));
    }

    #[test]
    fn test_messages_suppressed_in_json() {
        let out = render(OutputFormat::Json, |fmt| fmt.success("done"));
        assert!(out.is_empty());

        let out = render(OutputFormat::Pretty, |fmt| fmt.success("done"));
        assert_eq!(out, "✓ done\n");
    }
}
