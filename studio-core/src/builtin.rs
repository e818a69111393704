//! Built-in template library.
//!
//! Bodies use the `({ name = default, ... }) => markup` form understood by
//! the markup render backend; `{name}` expressions in the markup are bound to
//! property values.

use crate::{ComponentTemplate, PropertyDescriptor, PropertySchema, StudioResult, TemplateCategory};

type Builder = fn() -> StudioResult<ComponentTemplate>;

/// Constructors for every built-in template, in library order.
pub(crate) const TEMPLATES: &[Builder] = &[
    button_animated,
    button_gradient,
    card_profile,
    card_pricing,
    form_login,
    form_newsletter,
    nav_navbar,
    nav_breadcrumb,
    alert_banner,
    progress_bar,
    layout_hero,
];

fn button_animated() -> StudioResult<ComponentTemplate> {
    let schema = PropertySchema::from_entries([
        ("text", PropertyDescriptor::string("Click Me").in_section("Content")),
        (
            "backgroundColor",
            PropertyDescriptor::color("#6366f1")
                .in_section("Colors")
                .with_label("Background"),
        ),
        (
            "textColor",
            PropertyDescriptor::color("#ffffff")
                .in_section("Colors")
                .with_label("Text color"),
        ),
        (
            "size",
            PropertyDescriptor::select(["small", "medium", "large"], "medium").in_section("Style"),
        ),
        (
            "animation",
            PropertyDescriptor::select(["pulse", "bounce", "shake", "none"], "pulse")
                .in_section("Style"),
        ),
        ("rounded", PropertyDescriptor::checkbox(true).in_section("Style")),
    ])?;

    Ok(ComponentTemplate::new(
        "button-animated",
        "Animated Button",
        TemplateCategory::Buttons,
        r##"({ text = "Click Me", backgroundColor = "#6366f1", textColor = "#ffffff", size = "medium", animation = "pulse", rounded = true }) =>
<button class="btn btn-{size} anim-{animation} rounded-{rounded}" style="background: {backgroundColor}; color: {textColor}">{text}</button>"##,
    )
    .with_description("Call-to-action button with a looping attention animation")
    .with_schema(schema))
}

fn button_gradient() -> StudioResult<ComponentTemplate> {
    let schema = PropertySchema::from_entries([
        ("text", PropertyDescriptor::string("Get Started").in_section("Content")),
        ("fromColor", PropertyDescriptor::color("#ec4899").in_section("Colors")),
        ("toColor", PropertyDescriptor::color("#8b5cf6").in_section("Colors")),
        ("disabled", PropertyDescriptor::checkbox(false).in_section("State")),
    ])?;

    Ok(ComponentTemplate::new(
        "button-gradient",
        "Gradient Button",
        TemplateCategory::Buttons,
        r##"({ text = "Get Started", fromColor = "#ec4899", toColor = "#8b5cf6", disabled = false }) =>
<button class="btn btn-gradient" data-disabled="{disabled}" style="background: linear-gradient(90deg, {fromColor}, {toColor})">{text}</button>"##,
    )
    .with_description("Pill button with a two-stop linear gradient")
    .with_schema(schema))
}

fn card_profile() -> StudioResult<ComponentTemplate> {
    let schema = PropertySchema::from_entries([
        ("name", PropertyDescriptor::string("Jane Cooper").in_section("Content")),
        ("role", PropertyDescriptor::string("Product Designer").in_section("Content")),
        (
            "bio",
            PropertyDescriptor::text("Designing calm interfaces for busy people.")
                .in_section("Content"),
        ),
        (
            "avatarUrl",
            PropertyDescriptor::string("https://i.pravatar.cc/150")
                .in_section("Content")
                .with_label("Avatar URL"),
        ),
        ("accentColor", PropertyDescriptor::color("#0ea5e9").in_section("Colors")),
        ("showSocial", PropertyDescriptor::checkbox(true).in_section("Layout")),
    ])?;

    Ok(ComponentTemplate::new(
        "card-profile",
        "Profile Card",
        TemplateCategory::Cards,
        r##"({ name = "Jane Cooper", role = "Product Designer", bio = "Designing calm interfaces for busy people.", avatarUrl = "https://i.pravatar.cc/150", accentColor = "#0ea5e9", showSocial = true }) =>
<div class="card card-profile" style="border-top: 4px solid {accentColor}">
  <img class="avatar" src="{avatarUrl}" alt="{name}">
  <h3>{name}</h3>
  <p class="role" style="color: {accentColor}">{role}</p>
  <p class="bio">{bio}</p>
  <div class="social" data-visible="{showSocial}"></div>
</div>"##,
    )
    .with_description("Person card with avatar, role and short bio")
    .with_schema(schema))
}

fn card_pricing() -> StudioResult<ComponentTemplate> {
    let schema = PropertySchema::from_entries([
        ("plan", PropertyDescriptor::string("Pro").in_section("Content")),
        ("price", PropertyDescriptor::number(29.0).in_section("Content")),
        (
            "period",
            PropertyDescriptor::select(["month", "year"], "month").in_section("Content"),
        ),
        (
            "features",
            PropertyDescriptor::text("Unlimited projects\nPriority support\nCustom domains")
                .in_section("Content"),
        ),
        ("accentColor", PropertyDescriptor::color("#22c55e").in_section("Colors")),
        ("highlight", PropertyDescriptor::checkbox(false).in_section("Style")),
    ])?;

    Ok(ComponentTemplate::new(
        "card-pricing",
        "Pricing Card",
        TemplateCategory::Cards,
        r##"({ plan = "Pro", price = 29, period = "month", features = "Unlimited projects", accentColor = "#22c55e", highlight = false }) =>
<div class="card card-pricing" data-highlight="{highlight}">
  <h3>{plan}</h3>
  <p class="price" style="color: {accentColor}">${price}<span>/{period}</span></p>
  <pre class="features">{features}</pre>
</div>"##,
    )
    .with_description("Subscription tier with price, billing period and feature list")
    .with_schema(schema))
}

fn form_login() -> StudioResult<ComponentTemplate> {
    let schema = PropertySchema::from_entries([
        ("title", PropertyDescriptor::string("Welcome back").in_section("Content")),
        ("buttonText", PropertyDescriptor::string("Sign In").in_section("Content")),
        ("showRemember", PropertyDescriptor::checkbox(true).in_section("Options")),
        ("accentColor", PropertyDescriptor::color("#4f46e5").in_section("Colors")),
    ])?;

    Ok(ComponentTemplate::new(
        "form-login",
        "Login Form",
        TemplateCategory::Forms,
        r##"({ title = "Welcome back", buttonText = "Sign In", showRemember = true, accentColor = "#4f46e5" }) =>
<form class="form form-login">
  <h2>{title}</h2>
  <input type="email" placeholder="Email">
  <input type="password" placeholder="Password">
  <label data-visible="{showRemember}"><input type="checkbox"> Remember me</label>
  <button type="submit" style="background: {accentColor}">{buttonText}</button>
</form>"##,
    )
    .with_description("Email and password sign-in form")
    .with_schema(schema))
}

fn form_newsletter() -> StudioResult<ComponentTemplate> {
    let schema = PropertySchema::from_entries([
        ("heading", PropertyDescriptor::string("Stay in the loop").in_section("Content")),
        ("placeholder", PropertyDescriptor::string("you@example.com").in_section("Content")),
        ("buttonText", PropertyDescriptor::string("Subscribe").in_section("Content")),
        ("backgroundColor", PropertyDescriptor::color("#f1f5f9").in_section("Colors")),
    ])?;

    Ok(ComponentTemplate::new(
        "form-newsletter",
        "Newsletter Signup",
        TemplateCategory::Forms,
        r##"({ heading = "Stay in the loop", placeholder = "you@example.com", buttonText = "Subscribe", backgroundColor = "#f1f5f9" }) =>
<form class="form form-newsletter" style="background: {backgroundColor}">
  <h3>{heading}</h3>
  <input type="email" placeholder="{placeholder}">
  <button type="submit">{buttonText}</button>
</form>"##,
    )
    .with_description("Single-field email capture form")
    .with_schema(schema))
}

fn nav_navbar() -> StudioResult<ComponentTemplate> {
    let schema = PropertySchema::from_entries([
        ("brand", PropertyDescriptor::string("Acme").in_section("Content")),
        (
            "links",
            PropertyDescriptor::text("Home\nProducts\nPricing\nAbout").in_section("Content"),
        ),
        ("backgroundColor", PropertyDescriptor::color("#111827").in_section("Colors")),
        ("textColor", PropertyDescriptor::color("#f9fafb").in_section("Colors")),
        ("sticky", PropertyDescriptor::checkbox(false).in_section("Layout")),
    ])?;

    Ok(ComponentTemplate::new(
        "nav-navbar",
        "Navigation Bar",
        TemplateCategory::Navigation,
        r##"({ brand = "Acme", links = "Home", backgroundColor = "#111827", textColor = "#f9fafb", sticky = false }) =>
<nav class="navbar" data-sticky="{sticky}" style="background: {backgroundColor}; color: {textColor}">
  <span class="brand">{brand}</span>
  <pre class="links">{links}</pre>
</nav>"##,
    )
    .with_description("Top navigation bar with brand and link list")
    .with_schema(schema))
}

fn nav_breadcrumb() -> StudioResult<ComponentTemplate> {
    let schema = PropertySchema::from_entries([
        ("root", PropertyDescriptor::string("Home").in_section("Content")),
        ("section", PropertyDescriptor::string("Library").in_section("Content")),
        ("current", PropertyDescriptor::string("Components").in_section("Content")),
        (
            "separator",
            PropertyDescriptor::select(["/", ">", "•"], "/").in_section("Style"),
        ),
    ])?;

    Ok(ComponentTemplate::new(
        "nav-breadcrumb",
        "Breadcrumb",
        TemplateCategory::Navigation,
        r##"({ root = "Home", section = "Library", current = "Components", separator = "/" }) =>
<ol class="breadcrumb">
  <li>{root}</li><li class="sep">{separator}</li><li>{section}</li><li class="sep">{separator}</li><li aria-current="page">{current}</li>
</ol>"##,
    )
    .with_description("Three-level breadcrumb trail")
    .with_schema(schema))
}

fn alert_banner() -> StudioResult<ComponentTemplate> {
    let schema = PropertySchema::from_entries([
        (
            "message",
            PropertyDescriptor::text("Your changes have been saved.").in_section("Content"),
        ),
        (
            "variant",
            PropertyDescriptor::select(["info", "success", "warning", "error"], "success")
                .in_section("Style"),
        ),
        ("dismissible", PropertyDescriptor::checkbox(true).in_section("Options")),
    ])?;

    Ok(ComponentTemplate::new(
        "alert-banner",
        "Alert Banner",
        TemplateCategory::Feedback,
        r##"({ message = "Your changes have been saved.", variant = "success", dismissible = true }) =>
<div class="alert alert-{variant}" role="alert" data-dismissible="{dismissible}">{message}</div>"##,
    )
    .with_description("Inline status message in four severities")
    .with_schema(schema))
}

fn progress_bar() -> StudioResult<ComponentTemplate> {
    let schema = PropertySchema::from_entries([
        ("value", PropertyDescriptor::number(60.0).in_section("Content")),
        ("color", PropertyDescriptor::color("#3b82f6").in_section("Colors")),
        ("showLabel", PropertyDescriptor::checkbox(true).in_section("Options")),
    ])?;

    Ok(ComponentTemplate::new(
        "progress-bar",
        "Progress Bar",
        TemplateCategory::Feedback,
        r##"({ value = 60, color = "#3b82f6", showLabel = true }) =>
<div class="progress" role="progressbar" aria-valuenow="{value}">
  <div class="progress-fill" style="width: {value}%; background: {color}"></div>
  <span class="progress-label" data-visible="{showLabel}">{value}%</span>
</div>"##,
    )
    .with_description("Horizontal determinate progress indicator")
    .with_schema(schema))
}

fn layout_hero() -> StudioResult<ComponentTemplate> {
    let schema = PropertySchema::from_entries([
        ("headline", PropertyDescriptor::string("Build faster").in_section("Content")),
        (
            "subheadline",
            PropertyDescriptor::text("Ship polished interfaces from a library of ready components.")
                .in_section("Content"),
        ),
        ("ctaText", PropertyDescriptor::string("Start free trial").in_section("Content")),
        ("backgroundColor", PropertyDescriptor::color("#0f172a").in_section("Colors")),
        (
            "align",
            PropertyDescriptor::select(["left", "center", "right"], "center").in_section("Layout"),
        ),
    ])?;

    Ok(ComponentTemplate::new(
        "layout-hero",
        "Hero Section",
        TemplateCategory::Layout,
        r##"({ headline = "Build faster", subheadline = "Ship polished interfaces.", ctaText = "Start free trial", backgroundColor = "#0f172a", align = "center" }) =>
<section class="hero" style="background: {backgroundColor}; text-align: {align}">
  <h1>{headline}</h1>
  <p>{subheadline}</p>
  <a class="cta" href="#">{ctaText}</a>
</section>"##,
    )
    .with_description("Landing page hero with headline and call to action")
    .with_schema(schema))
}
