use serde::Serialize;

use crate::models::{AssetPathSet, DeploymentMode};

/// Inputs that decide the contents of the asset path table.
#[derive(Debug, Clone)]
pub struct PathTableOptions<'a> {
    /// Project name used in artifact file names.
    pub project_name: &'a str,
    /// Build output directory, relative to the project root.
    pub output_dir: &'a str,
    /// Base URL of the remote deployment; the project name is appended to it.
    pub remote_base: &'a str,
    /// Whether local styles are compiled into `.tmp/css` instead of served from `styles/`.
    pub use_compass: bool,
}

/// Fixed table holding one [`AssetPathSet`] per deployment mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetPathTable {
    local: AssetPathSet,
    build: AssetPathSet,
    deploy: AssetPathSet,
}

impl AssetPathTable {
    /// Build the table for a project.
    pub fn new(options: &PathTableOptions<'_>) -> Self {
        let name = options.project_name;
        let output = options.output_dir.trim_end_matches('/');
        let remote = format!("{}/{}", options.remote_base.trim_end_matches('/'), name);

        let local_css = if options.use_compass {
            ".tmp/css/main.css"
        } else {
            "styles/styles.css"
        };

        Self {
            local: AssetPathSet {
                css: vec![local_css.to_string()],
                ie: Vec::new(),
                images: "images/".into(),
                data: "data/".into(),
            },
            build: minified_path_set(output, name),
            deploy: minified_path_set(&remote, name),
        }
    }

    /// Path set active for `mode`.
    pub fn get(&self, mode: DeploymentMode) -> &AssetPathSet {
        match mode {
            DeploymentMode::Local => &self.local,
            DeploymentMode::Build => &self.build,
            DeploymentMode::Deploy => &self.deploy,
        }
    }
}

fn minified_path_set(base: &str, name: &str) -> AssetPathSet {
    AssetPathSet {
        css: vec![
            format!("{base}/{name}.libs.min.css"),
            format!("{base}/{name}.latest.min.css"),
        ],
        ie: vec![
            format!("{base}/{name}.libs.min.ie.css"),
            format!("{base}/{name}.latest.min.ie.css"),
        ],
        images: format!("{base}/images/"),
        data: format!("{base}/data/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(use_compass: bool) -> PathTableOptions<'static> {
        PathTableOptions {
            project_name: "election-map",
            output_dir: "dist",
            remote_base: "https://s3.amazonaws.com/data.minnpost/projects/",
            use_compass,
        }
    }

    #[test]
    fn local_set_follows_style_pipeline() {
        let compass = AssetPathTable::new(&options(true));
        assert_eq!(compass.get(DeploymentMode::Local).css, vec![".tmp/css/main.css"]);

        let plain = AssetPathTable::new(&options(false));
        let local = plain.get(DeploymentMode::Local);
        assert_eq!(local.css, vec!["styles/styles.css"]);
        assert!(local.ie.is_empty());
        assert_eq!(local.images, "images/");
        assert_eq!(local.data, "data/");
    }

    #[test]
    fn build_set_points_at_output_directory() {
        let table = AssetPathTable::new(&options(true));
        let build = table.get(DeploymentMode::Build);
        assert_eq!(build.css, vec![
            "dist/election-map.libs.min.css".to_string(),
            "dist/election-map.latest.min.css".to_string(),
        ]);
        assert_eq!(build.ie[1], "dist/election-map.latest.min.ie.css");
        assert_eq!(build.images, "dist/images/");
    }

    #[test]
    fn deploy_set_is_fully_qualified() {
        let table = AssetPathTable::new(&options(true));
        let deploy = table.get(DeploymentMode::Deploy);
        assert_eq!(
            deploy.css[0],
            "https://s3.amazonaws.com/data.minnpost/projects/election-map/election-map.libs.min.css"
        );
        assert_eq!(
            deploy.data,
            "https://s3.amazonaws.com/data.minnpost/projects/election-map/data/"
        );
    }
}
