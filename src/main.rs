use std::error::Error;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use clap::Parser;
use iced::keyboard::{self, key::Named, Key};
use iced::widget::{
    button, column, container, horizontal_space, mouse_area, row, scrollable, stack, text,
    text_input, Column,
};
use iced::{event, widget, window, Alignment, Element, Length, Size, Subscription, Task, Theme};
use iced_aw::Wrap;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use album_viewer::config::ViewerConfig;
use album_viewer::fetch::{self, Fetcher};
use album_viewer::ui::layout::{self, SizeListener};
use album_viewer::ui::screen::THUMBNAIL_LONG_SIDE;
use album_viewer::ui::{
    command_for, AlbumScreen, Canvas, Dimensions, History, KeyCommand, LayoutResult, NavKey,
    Painted, PhotoFitter, PhotoScreen, PhotoSurface, PixelStore, ThumbnailLink,
};
use album_viewer::{Completion, NavigationController, NavigationTarget, Request};

/// Browse a photo album made of static JSON descriptors
#[derive(Debug, Parser)]
#[command(name = "album-viewer", version, about)]
struct Cli {
    /// Config file (defaults to album-viewer/config.toml in the config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Album tree: a directory or an http(s) base URL
    #[arg(long, env = "ALBUM_VIEWER_SOURCE")]
    source: Option<String>,

    /// Fragment to open, e.g. "#/2014/trip/3"
    fragment: Option<String>,

    /// Pixels kept free around the full-screen overlay
    #[arg(long)]
    overlay_margin: Option<f32>,

    /// Width or height below which the compact layout is used
    #[arg(long)]
    small_screen: Option<f32>,
}

/// Space taken by the address bar, headings and footer around the photo panel
const CHROME_WIDTH: f32 = 320.0;
const CHROME_HEIGHT: f32 = 200.0;
/// Width of the compact layout's margins
const COMPACT_MARGIN: f32 = 40.0;

/// The photo panel as the fitter sees it
struct PhotoPanel {
    natural: Option<Dimensions>,
    window: Size,
    compact: bool,
    layout: Option<LayoutResult>,
    listener: Rc<SizeListener>,
}

impl PhotoSurface for PhotoPanel {
    fn natural_size(&self) -> Option<Dimensions> {
        self.natural
    }

    fn panel_size(&self) -> Dimensions {
        // The compact layout stacks the details below the photo
        let chrome = if self.compact { COMPACT_MARGIN } else { CHROME_WIDTH };
        let width = self.window.width - chrome;
        Dimensions::new(width.max(0.0), (self.window.height - CHROME_HEIGHT).max(0.0))
    }

    fn viewport_size(&self) -> Dimensions {
        Dimensions::new(self.window.width, self.window.height)
    }

    fn apply(&mut self, layout: &LayoutResult) {
        // New dimensions reflow the image, which reports its size again
        if self.layout.as_ref() != Some(layout) {
            self.listener.notify();
        }
        self.layout = Some(*layout);
    }
}

/// Main application state
struct AlbumViewer {
    controller: NavigationController,
    fetcher: Arc<dyn Fetcher>,
    canvas: Canvas,
    history: History,
    /// Contents of the address bar
    address: String,
    /// Decoded images of the current album
    pixels: PixelStore<widget::image::Handle>,
    fitter: PhotoFitter,
    panel: PhotoPanel,
    small_screen_threshold: f32,
    overlay_open: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    AddressChanged(String),
    AddressSubmitted,
    Back,
    Forward,
    Key(NavKey),
    /// Follow a fragment link
    Open(String),
    /// A descriptor or pixel fetch finished
    Fetched(Completion),
    Resized(Size),
    ToggleOverlay,
}

impl AlbumViewer {
    fn new(config: ViewerConfig, fetcher: Arc<dyn Fetcher>) -> (Self, Task<Message>) {
        let fitter = PhotoFitter::new(config.overlay_margin);
        let panel = PhotoPanel {
            natural: None,
            window: Size::new(1280.0, 800.0),
            compact: false,
            layout: None,
            listener: fitter.listener(),
        };

        let mut viewer = AlbumViewer {
            controller: NavigationController::new(),
            fetcher,
            canvas: Canvas::new(),
            history: History::new(),
            address: String::new(),
            pixels: PixelStore::new(),
            fitter,
            panel,
            small_screen_threshold: config.small_screen_threshold,
            overlay_open: false,
        };

        let task = match config.start {
            Some(fragment) => viewer.visit(fragment),
            None => Task::none(),
        };
        (viewer, task)
    }

    /// Navigate and record the fragment in history
    fn visit(&mut self, fragment: String) -> Task<Message> {
        self.history.visit(fragment.clone());
        self.go(fragment)
    }

    /// Navigate without touching history
    fn go(&mut self, fragment: String) -> Task<Message> {
        info!("🧭 {}", fragment);
        self.overlay_open = false;
        let requests = self.controller.navigate(&fragment, &mut self.canvas);
        self.address = fragment;
        self.after_controller(requests)
    }

    fn visit_target(&mut self, target: NavigationTarget) -> Task<Message> {
        self.visit(target.to_fragment())
    }

    /// Run the controller's requests plus whatever pixels the canvas now needs
    fn after_controller(&mut self, requests: Vec<Request>) -> Task<Message> {
        self.pixels.follow_album(self.controller.session().cache.album_id());

        let pixel_requests = self
            .canvas
            .take_pixel_requests()
            .into_iter()
            .map(Request::Preload);

        let tasks: Vec<Task<Message>> = requests
            .into_iter()
            .chain(pixel_requests)
            .filter_map(|request| self.dispatch(request))
            .collect();

        self.refit();
        Task::batch(tasks)
    }

    fn dispatch(&mut self, request: Request) -> Option<Task<Message>> {
        if let Request::Preload(uri) = &request {
            if !self.pixels.begin(uri) {
                return None;
            }
        }
        let fetcher = self.fetcher.clone();
        Some(Task::perform(fetch::resolve(fetcher, request), Message::Fetched))
    }

    fn current_photo(&self) -> Option<&PhotoScreen> {
        match &self.canvas.painted {
            Painted::Photo(screen) => Some(screen),
            _ => None,
        }
    }

    /// Re-run the fitter against the photo currently painted
    fn refit(&mut self) {
        // Decoded pixels win over the descriptor's declared size
        let natural = self.current_photo().map(|screen| {
            self.pixels.natural_size(&screen.photo_uri).unwrap_or_else(|| {
                Dimensions::new(screen.photo.width as f32, screen.photo.height as f32)
            })
        });

        if natural != self.panel.natural {
            self.panel.natural = natural;
            self.fitter.listener().notify();
        }
        if natural.is_none() {
            self.panel.layout = None;
            return;
        }
        self.fitter.on_natural_size_changed(&mut self.panel);
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::AddressChanged(address) => {
                self.address = address;
                Task::none()
            }
            Message::AddressSubmitted => self.visit(self.address.clone()),
            Message::Open(fragment) => self.visit(fragment),
            Message::Back => match self.history.back().map(str::to_string) {
                Some(fragment) => self.go(fragment),
                None => Task::none(),
            },
            Message::Forward => match self.history.forward().map(str::to_string) {
                Some(fragment) => self.go(fragment),
                None => Task::none(),
            },
            Message::Key(key) => match command_for(key, &self.controller, self.overlay_open) {
                Some(KeyCommand::Navigate(target)) => self.visit_target(target),
                Some(KeyCommand::ToggleOverlay) => self.update(Message::ToggleOverlay),
                Some(KeyCommand::CloseOverlay) => {
                    self.overlay_open = false;
                    Task::none()
                }
                None => Task::none(),
            },
            Message::Fetched(completion) => {
                if let Completion::Preload { uri, result } = &completion {
                    self.pixels
                        .finish(uri, result, |bytes| widget::image::Handle::from_bytes(bytes));
                }
                let requests = self.controller.complete(completion, &mut self.canvas);
                self.after_controller(requests)
            }
            Message::Resized(size) => {
                debug!("Window resized to {}x{}", size.width, size.height);
                self.panel.window = size;
                self.panel.compact = layout::is_small_screen(
                    Dimensions::new(size.width, size.height),
                    self.small_screen_threshold,
                );
                if self.fitter.refit(&mut self.panel).is_none() {
                    self.panel.layout = None;
                }
                Task::none()
            }
            Message::ToggleOverlay => {
                let enabled = self.panel.layout.is_some_and(|l| l.overlay_enabled());
                self.overlay_open = enabled && !self.overlay_open;
                Task::none()
            }
        }
    }

    fn title(&self) -> String {
        self.canvas.title()
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let address = row![
            button("◀").on_press_maybe(self.history.can_go_back().then_some(Message::Back)),
            button("▶")
                .on_press_maybe(self.history.can_go_forward().then_some(Message::Forward)),
            text_input("#/album/page", &self.address)
                .on_input(Message::AddressChanged)
                .on_submit(Message::AddressSubmitted),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let page: Element<Message> = match &self.canvas.painted {
            Painted::Blank => text("Enter an album fragment, e.g. #/2014/trip").into(),
            Painted::Album(screen) => self.album_view(screen),
            Painted::Photo(screen) => self.photo_view(screen),
        };

        let mut content: Column<Message> = column![address].spacing(16).padding(20);
        if let Some(link) = self.canvas.leave_debug_link() {
            content = content.push(
                button(text("Leave debug mode").size(12)).on_press(Message::Open(link.to_string())),
            );
        }
        if let Some(error) = &self.canvas.error {
            content = content.push(text(error).size(18).color([0.9, 0.3, 0.3]));
        }
        content = content.push(page);

        let base = container(content).width(Length::Fill).height(Length::Fill);

        match (self.overlay_open, self.current_photo(), self.panel.layout) {
            (true, Some(screen), Some(layout)) => {
                stack![base, self.overlay(screen, &layout)].into()
            }
            _ => base.into(),
        }
    }

    fn picture(&self, uri: &str, width: f32, height: f32) -> Element<'_, Message> {
        match self.pixels.get(uri) {
            Some(handle) => widget::image(handle.clone())
                .width(Length::Fixed(width))
                .height(Length::Fixed(height))
                .into(),
            None => container(text("…"))
                .width(Length::Fixed(width))
                .height(Length::Fixed(height))
                .center_x(Length::Fixed(width))
                .center_y(Length::Fixed(height))
                .into(),
        }
    }

    fn thumbnail(&self, link: &ThumbnailLink) -> Element<'_, Message> {
        let frame = link.frame();
        let image = self.picture(&link.uri, frame.width, frame.height);
        mouse_area(container(image).padding(4))
            .on_press(Message::Open(link.link.clone()))
            .into()
    }

    fn neighbour(&self, link: &Option<ThumbnailLink>, label: &'static str) -> Element<'_, Message> {
        match link {
            Some(link) => column![self.thumbnail(link), text(label).size(12)]
                .align_x(Alignment::Center)
                .into(),
            None => horizontal_space().width(Length::Fixed(THUMBNAIL_LONG_SIDE)).into(),
        }
    }

    fn album_view<'a>(&'a self, screen: &'a AlbumScreen) -> Element<'a, Message> {
        let thumbnails = screen.thumbnails.iter().map(|link| self.thumbnail(link)).collect();

        let mut page = column![
            text(&screen.title).size(32),
            text(&screen.description),
            Wrap::with_elements(thumbnails),
            text(&screen.footer).size(12),
        ]
        .spacing(12);
        if screen.debug {
            page = page.push(text(format!("{} photos", screen.thumbnails.len())).size(12));
        }
        scrollable(page).into()
    }

    fn photo_view<'a>(&'a self, screen: &'a PhotoScreen) -> Element<'a, Message> {
        let photo: Element<Message> = match self.panel.layout {
            Some(layout) => mouse_area(self.picture(
                &screen.photo_uri,
                layout.display_width,
                layout.display_height,
            ))
            .on_press(Message::ToggleOverlay)
            .into(),
            None => text("Loading photo…").into(),
        };

        let mut details = column![
            button(text(screen.index_label())).on_press(Message::Open(screen.index_link.clone())),
            row![
                self.neighbour(&screen.previous, "Previous"),
                self.neighbour(&screen.next, "Next"),
            ]
            .spacing(8),
        ]
        .spacing(12);
        for line in &screen.photo.caption {
            details = details.push(text(line));
        }
        for (name, value) in &screen.photo.properties {
            details = details.push(text(format!("{}: {}", name, value)).size(12));
        }
        if screen.debug {
            details = details.push(
                text(format!(
                    "{} ({}x{})",
                    screen.photo_uri, screen.photo.width, screen.photo.height
                ))
                .size(12),
            );
        }

        let body: Element<Message> = if self.panel.compact {
            column![photo, details].spacing(16).into()
        } else {
            row![photo, details].spacing(16).into()
        };

        scrollable(column![
            text(&screen.album_title).size(24),
            body,
            text(&screen.footer).size(12),
        ]
        .spacing(12))
        .into()
    }

    fn overlay(&self, screen: &PhotoScreen, layout: &LayoutResult) -> Element<'_, Message> {
        let image = self.picture(&screen.photo_uri, layout.overlay_width, layout.overlay_height);
        mouse_area(
            container(image)
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .style(container::dark),
        )
        .on_press(Message::ToggleOverlay)
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let resizes = event::listen_with(|event, _status, _window| match event {
            iced::Event::Window(window::Event::Resized(size)) => Some(Message::Resized(size)),
            _ => None,
        });
        let keys = keyboard::on_key_press(|key, _modifiers| {
            let key = match key {
                Key::Named(Named::PageDown | Named::Space) => NavKey::Next,
                Key::Named(Named::PageUp | Named::Backspace) => NavKey::Previous,
                Key::Named(Named::Home) => NavKey::Home,
                Key::Named(Named::Escape) => NavKey::Escape,
                Key::Named(Named::Enter) => NavKey::Enter,
                _ => return None,
            };
            Some(Message::Key(key))
        });
        Subscription::batch([resizes, keys])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("album_viewer=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match ViewerConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_none() => {
            warn!("⚠️  {}; using defaults", e);
            ViewerConfig::default()
        }
        Err(e) => return Err(e.into()),
    };
    let config =
        config.with_overrides(cli.source, cli.fragment, cli.overlay_margin, cli.small_screen);

    let fetcher = fetch::for_source(&config.source)?;
    info!("🎨 Album viewer reading from {}", config.source);

    iced::application(AlbumViewer::title, AlbumViewer::update, AlbumViewer::view)
        .subscription(AlbumViewer::subscription)
        .theme(AlbumViewer::theme)
        .window_size(Size::new(1280.0, 800.0))
        .centered()
        .run_with(move || AlbumViewer::new(config, fetcher))?;

    Ok(())
}
