use crate::core::interfaces::CssDeduplicator;
use crate::core::models::{DedupeOptions, DedupeOutput, SourceMapOptions};
use crate::utils::{CssBundleError, CssLocation, Result, Timer};
use lightningcss::{
    error::{Error as CssError, ParserError},
    properties::Property,
    rules::{style::StyleRule, CssRule, CssRuleList},
    stylesheet::{ParserOptions, PrinterOptions, StyleSheet},
    traits::ToCss,
};
use parcel_sourcemap::SourceMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Removes structurally identical rules, such as the copies CSS Modules'
/// `composes` leaves behind in a concatenated bundle, and repeated identical
/// declarations inside a style rule. The last copy wins so the cascade
/// resolves the same way as before.
#[derive(Debug, Default)]
pub struct LightningCssDeduplicator;

impl LightningCssDeduplicator {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Removed {
    rules: usize,
    declarations: usize,
}

impl std::ops::AddAssign for Removed {
    fn add_assign(&mut self, other: Self) {
        self.rules += other.rules;
        self.declarations += other.declarations;
    }
}

impl CssDeduplicator for LightningCssDeduplicator {
    fn dedupe(&self, css: &str, options: &DedupeOptions<'_>) -> Result<DedupeOutput> {
        let filename = options.filename.to_string_lossy().into_owned();
        let _timer = Timer::start(&format!("Deduplicating CSS {}", filename));

        let mut stylesheet = StyleSheet::parse(
            css,
            ParserOptions {
                filename,
                ..ParserOptions::default()
            },
        )
        .map_err(|e| parse_error(&e, css, &options.filename))?;

        let removed = dedupe_rules(&mut stylesheet.rules)?;

        // Map paths are resolved against the map's own directory, never the cwd
        let map_filename = match &options.source_map {
            Some(_) => Some(absolute_path(&options.filename)?),
            None => None,
        };
        let mut source_map = match (&options.source_map, &map_filename) {
            (Some(map_options), Some(map_filename)) => {
                Some(new_source_map(map_filename, css, map_options)?)
            }
            _ => None,
        };

        let result = stylesheet
            .to_css(PrinterOptions {
                source_map: source_map.as_mut(),
                ..PrinterOptions::default()
            })
            .map_err(|e| CssBundleError::Print(e.to_string()))?;

        let map = match (source_map, &options.source_map, &map_filename) {
            (Some(mut map), Some(map_options), Some(map_filename)) => {
                if let Some(previous) = map_options.previous {
                    let mut previous = SourceMap::from_json(&project_root(map_filename), previous)
                        .map_err(|e| {
                            CssBundleError::source_map(format!("Invalid upstream map: {:?}", e))
                        })?;
                    map.extends(&mut previous)
                        .map_err(|e| CssBundleError::source_map(format!("{:?}", e)))?;
                }

                Some(
                    map.to_json(None)
                        .map_err(|e| CssBundleError::source_map(format!("{:?}", e)))?,
                )
            }
            _ => None,
        };

        Ok(DedupeOutput {
            code: result.code,
            map,
            removed_rules: removed.rules,
            removed_declarations: removed.declarations,
        })
    }
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Sources are recorded relative to the stylesheet's own directory, which is
/// also where the map is written.
fn project_root(filename: &Path) -> String {
    filename
        .parent()
        .map(|dir| dir.to_string_lossy().into_owned())
        .filter(|dir| !dir.is_empty())
        .unwrap_or_else(|| "/".to_string())
}

fn new_source_map(filename: &Path, css: &str, options: &SourceMapOptions<'_>) -> Result<SourceMap> {
    let mut map = SourceMap::new(&project_root(filename));
    let source_index = map.add_source(&filename.to_string_lossy());

    // With an upstream map the bundle is only an intermediate step; its text
    // would sit in sourcesContent with no mapping pointing at it.
    if options.sources_content && options.previous.is_none() {
        map.set_source_content(source_index as usize, css)
            .map_err(|e| CssBundleError::source_map(format!("{:?}", e)))?;
    }

    Ok(map)
}

/// Drop every rule that prints identically to a later one in the same list.
/// Every rule that owns a rule list is cleaned inside first, so two equal
/// blocks compare on their deduplicated contents.
fn dedupe_rules(rules: &mut CssRuleList<'_>) -> Result<Removed> {
    let mut removed = Removed::default();

    for rule in rules.0.iter_mut() {
        removed += match rule {
            CssRule::Style(style) => dedupe_style_rule(style)?,
            CssRule::Nesting(nesting) => dedupe_style_rule(&mut nesting.style)?,
            CssRule::Media(media) => dedupe_rules(&mut media.rules)?,
            CssRule::Supports(supports) => dedupe_rules(&mut supports.rules)?,
            CssRule::LayerBlock(layer) => dedupe_rules(&mut layer.rules)?,
            CssRule::Container(container) => dedupe_rules(&mut container.rules)?,
            CssRule::Scope(scope) => dedupe_rules(&mut scope.rules)?,
            CssRule::StartingStyle(starting) => dedupe_rules(&mut starting.rules)?,
            CssRule::MozDocument(document) => dedupe_rules(&mut document.rules)?,
            _ => Removed::default(),
        };
    }

    let keys = rules
        .0
        .iter()
        .map(rule_key)
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::new();
    let mut keep = vec![true; keys.len()];
    for (index, key) in keys.iter().enumerate().rev() {
        if let Some(key) = key {
            if !seen.insert(key.as_str()) {
                keep[index] = false;
                removed.rules += 1;
            }
        }
    }

    let mut index = 0;
    rules.0.retain(|_| {
        let kept = keep[index];
        index += 1;
        kept
    });

    Ok(removed)
}

fn dedupe_style_rule(style: &mut StyleRule<'_>) -> Result<Removed> {
    let mut removed = dedupe_rules(&mut style.rules)?;
    removed.declarations += dedupe_declarations(&mut style.declarations.declarations);
    removed.declarations += dedupe_declarations(&mut style.declarations.important_declarations);
    Ok(removed)
}

/// `color: red; color: red` keeps the last one
fn dedupe_declarations(declarations: &mut Vec<Property<'_>>) -> usize {
    let keep: Vec<bool> = (0..declarations.len())
        .map(|index| !declarations[index + 1..].contains(&declarations[index]))
        .collect();

    let before = declarations.len();
    let mut index = 0;
    declarations.retain(|_| {
        let kept = keep[index];
        index += 1;
        kept
    });
    before - declarations.len()
}

/// Minified serialization, so whitespace and formatting differences between
/// copies don't matter.
fn rule_key(rule: &CssRule<'_>) -> Result<Option<String>> {
    if matches!(rule, CssRule::Ignored) {
        return Ok(None);
    }

    rule.to_css_string(PrinterOptions {
        minify: true,
        ..PrinterOptions::default()
    })
    .map(Some)
    .map_err(|e| CssBundleError::Print(e.to_string()))
}

fn parse_error(error: &CssError<ParserError<'_>>, css: &str, path: &Path) -> CssBundleError {
    // lightningcss lines are 0-based, columns 1-based
    let location = error.loc.as_ref().map(|loc| CssLocation {
        path: path.to_path_buf(),
        line: loc.line as usize + 1,
        column: loc.column as usize,
        line_text: css.lines().nth(loc.line as usize).map(str::to_string),
    });

    CssBundleError::Parse {
        message: error.kind.to_string(),
        path: path.to_path_buf(),
        location,
    }
}
