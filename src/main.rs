mod app;
mod assets;
mod camera;
mod event;

use clap::Parser;

use marquee_matrix::OrbConfig;

#[derive(Parser, Debug)]
#[command(name = "marquee", about = "Scrolling LED marquee rendered on a sphere")]
struct Args {
    /// Message to display (overrides the config file)
    #[arg(long)]
    text: Option<String>,
    /// Scroll speed in offset units per second (overrides the config file)
    #[arg(long)]
    speed: Option<f32>,
    /// Assets root directory (contains assets/orb.toml and assets/shaders/)
    #[arg(long)]
    assets: Option<String>,
    /// Watch assets/orb.toml and hot-reload it
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    watch: bool,
    /// Window size
    #[arg(long, default_value_t = 1280)]
    width: i32,
    #[arg(long, default_value_t = 720)]
    height: i32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let assets_root = assets::resolve_assets_root(args.assets.clone());
    log::info!("assets root: {}", assets_root.display());

    let config_path = assets::config_path(&assets_root);
    let mut cfg = match OrbConfig::load_from_path(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!(
                "could not load {}: {e}; using built-in defaults",
                config_path.display()
            );
            OrbConfig::default()
        }
    };
    if let Some(text) = args.text {
        cfg.text = text;
    }
    if let Some(speed) = args.speed {
        cfg.scroll_speed = speed;
    }
    if let Err(e) = cfg.validate() {
        log::error!("invalid configuration: {e}");
        std::process::exit(2);
    }

    let (mut rl, thread) = raylib::init()
        .size(args.width, args.height)
        .title("LED Marquee Orb")
        .build();
    rl.set_target_fps(60);

    let mut app = match app::App::new(&mut rl, &thread, cfg, assets_root, args.watch) {
        Ok(app) => app,
        Err(e) => {
            log::error!("startup failed: {e}");
            std::process::exit(1);
        }
    };

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        app.step(&mut rl, &thread, dt);
        app.render(&mut rl, &thread);
    }
}
