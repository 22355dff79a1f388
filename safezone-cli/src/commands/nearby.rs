//! `safezone nearby` - points of interest sorted by distance.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use console::style;
use safezone::catalog::{Catalog, Category, PointOfInterest};
use safezone::interaction::{MapInteractionController, UriHandoff};
use safezone::map::{create_renderer, event_channel, MapEvent, MapEventReceiver};
use safezone::proximity::{ProximityEntry, ProximityQuery};

use super::common::{acquire, load_catalog, load_config, runtime, PositionArgs};
use crate::error::CliError;
use crate::host::PrintLauncher;

const MAP_WIDTH: usize = 61;
const MAP_HEIGHT: usize = 21;

#[derive(Debug, Args)]
pub struct NearbyArgs {
    #[command(flatten)]
    pub position: PositionArgs,

    /// Only show this category (repeatable): police_station, hospital,
    /// shelter, community_center, incident
    #[arg(short, long = "category")]
    pub categories: Vec<Category>,

    /// Hide points further away than this many kilometers
    #[arg(long)]
    pub within_km: Option<f64>,

    /// Show at most this many points
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Only verified police stations, hospitals, shelters and community centers
    #[arg(long)]
    pub safe_zones_only: bool,

    /// JSON catalog to use instead of the configured one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Draw the points on a text map
    #[arg(long)]
    pub map: bool,

    /// Select a point by id and show its details
    #[arg(long)]
    pub select: Option<String>,

    /// Open directions to the selected point
    #[arg(long, requires = "select")]
    pub directions: bool,

    /// Call the selected point
    #[arg(long, requires = "select")]
    pub call: bool,
}

impl NearbyArgs {
    fn query(&self) -> ProximityQuery {
        let mut query = ProximityQuery::new()
            .categories(self.categories.iter().copied())
            .safe_zones_only(self.safe_zones_only);
        if let Some(km) = self.within_km {
            query = query.within_km(km);
        }
        if let Some(n) = self.limit {
            query = query.limit(n);
        }
        query
    }
}

pub fn run(args: NearbyArgs, config_path: &Path) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(args.catalog.as_deref(), &config)?;
    let device = args.position.device()?;

    runtime()?.block_on(async {
        let provider = acquire(device, &config).await;
        let fix = provider.current_fix();
        let entries = args.query().run(&catalog, fix.as_ref());
        println!();
        print_entries(&entries);

        let (events_tx, mut events_rx) = event_channel();
        let mut renderer = create_renderer(config.map.renderer, None, events_tx);
        renderer.render(&entries, fix.as_ref());

        if args.map {
            if let Some(preview) = renderer.text_preview(MAP_WIDTH, MAP_HEIGHT) {
                println!();
                println!("{preview}");
            }
        }

        if let Some(id) = &args.select {
            let mut controller =
                MapInteractionController::with_uri_handoff(UriHandoff::new(Arc::new(PrintLauncher)));

            if !renderer.click(id) {
                return Err(CliError::UnknownPoint(id.clone()));
            }
            drain(&mut controller, &mut events_rx, &catalog);
            if let Some(point) = controller.selected_point(&catalog) {
                println!();
                print_details(point, entries.iter().find(|e| e.id() == id.as_str()));
            }

            if args.directions {
                renderer.emit(MapEvent::DirectionsRequested { id: id.clone() });
            }
            if args.call {
                renderer.emit(MapEvent::CallRequested { id: id.clone() });
            }
            drop(renderer);
            controller.run(&mut events_rx, &catalog).await;
        }

        provider.stop();
        Ok(())
    })
}

/// Apply events that are already queued.
fn drain(controller: &mut MapInteractionController, events: &mut MapEventReceiver, catalog: &Catalog) {
    while let Ok(event) = events.try_recv() {
        controller.handle_event(event, catalog);
    }
}

fn print_entries(entries: &[ProximityEntry]) {
    if entries.is_empty() {
        println!("No matching points.");
        return;
    }

    println!(
        "{}",
        style(format!(
            "{:>3}  {}  {:<38} {:<14} {}",
            "#", "T", "Name", "Distance", "Id"
        ))
        .bold()
    );
    for (i, entry) in entries.iter().enumerate() {
        let point = &entry.point;
        let distance = entry.distance_label().unwrap_or_else(|| "-".to_string());
        let name = if point.is_safe_zone() {
            format!("{} ✓", point.name)
        } else {
            point.name.clone()
        };
        println!(
            "{:>3}  {}  {:<38} {:<14} {}",
            i + 1,
            point.category.glyph(),
            truncate(&name, 38),
            distance,
            style(&point.id).dim()
        );
    }
}

fn print_details(point: &PointOfInterest, entry: Option<&ProximityEntry>) {
    println!("{}", style(&point.name).bold().underlined());
    println!("  Category: {}", point.category.label());
    println!("  Address:  {}", point.address);
    if let Some(phone) = &point.phone {
        println!("  Phone:    {}", phone);
    }
    if let Some(label) = entry.and_then(ProximityEntry::distance_label) {
        println!("  Distance: {}", label);
    }
    if let Some(rating) = point.rating {
        println!("  Rating:   {:.1}", rating);
    }
    if let Some(description) = &point.description {
        println!("  {}", description);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: NearbyArgs,
    }

    #[test]
    fn test_parse_categories_and_query() {
        let cli = TestCli::parse_from([
            "safezone",
            "--lat",
            "6.9271",
            "--lon",
            "79.8612",
            "-c",
            "hospital",
            "--category",
            "police",
            "-n",
            "2",
        ]);
        assert_eq!(cli.args.categories, vec![Category::Hospital, Category::PoliceStation]);

        let catalog = Catalog::sample().unwrap();
        let origin = safezone::geo::GeoPosition::now(6.9271, 79.8612, 10.0).unwrap();
        let entries = cli.args.query().run(&catalog, Some(&origin));
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .all(|e| matches!(e.point.category, Category::Hospital | Category::PoliceStation)));
    }

    #[test]
    fn test_negative_coordinates_parse() {
        let cli = TestCli::parse_from(["safezone", "--lat", "-33.86", "--lon", "151.21"]);
        assert_eq!(cli.args.position.lat, Some(-33.86));
    }

    #[test]
    fn test_directions_requires_select() {
        assert!(TestCli::try_parse_from(["safezone", "--directions"]).is_err());
    }

    #[test]
    fn test_lat_requires_lon() {
        assert!(TestCli::try_parse_from(["safezone", "--lat", "6.9"]).is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
