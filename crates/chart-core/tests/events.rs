// File: crates/chart-core/tests/events.rs
// Purpose: Change notification: one event per mutation, relays up to the chart, suspension, unbinding and detaching.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use freechart_core::data::{XySeries, XySeriesCollection};
use freechart_core::{
    shared, AxisKind, ChangeEvent, ChangeKind, Chart, ChartError, Observable, RecordingCanvas, Rect, Result, ValueAxis, XyAnnotation, XyPlot, XyRenderer,
};

fn collection() -> XySeriesCollection {
    let mut s = XySeries::new("s");
    s.add(1.0, 1.0).unwrap();
    s.add(2.0, 4.0).unwrap();
    XySeriesCollection::with_series(s).unwrap()
}

fn recorder<T: Observable>(target: &T) -> Rc<RefCell<Vec<ChangeEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    target.on_change(move |e: &ChangeEvent| {
        sink.borrow_mut().push(e.clone());
        Ok(())
    });
    events
}

#[test]
fn one_event_per_successful_mutation() -> Result<()> {
    let mut ds = XySeriesCollection::new();
    let events = recorder(&ds);

    ds.add_series(XySeries::new("a"))?;
    ds.add(0, 1.0, 2.0)?;
    ds.modify_series(0, |s| {
        s.add(2.0, 3.0)?;
        s.add(3.0, None)
    })?;
    assert!(ds.add(5, 1.0, 1.0).is_err());
    assert!(ds.modify_series(0, |s| s.add(f64::NAN, 1.0)).is_err());

    let kinds: Vec<ChangeKind> = events.borrow().iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec![ChangeKind::Dataset, ChangeKind::Series { index: 0 }, ChangeKind::Series { index: 0 }]);
    assert!(events.borrow().iter().all(|e| e.source() == ds.id() && e.cause().is_none()));
    Ok(())
}

#[test]
fn suspended_notification_catches_up_once() -> Result<()> {
    let mut ds = collection();
    let events = recorder(&ds);
    ds.set_notify(false)?;
    assert!(!ds.is_notify());
    for x in 3..6 {
        ds.add(0, x as f64, 1.0)?;
    }
    assert!(events.borrow().is_empty());

    ds.set_notify(true)?;
    assert_eq!(events.borrow().len(), 1);
    assert_eq!(events.borrow()[0].kind(), ChangeKind::Dataset);

    // resuming twice does not fire again
    ds.set_notify(true)?;
    assert_eq!(events.borrow().len(), 1);
    Ok(())
}

#[test]
fn failing_listener_aborts_dispatch() {
    let mut ds = XySeriesCollection::new();
    ds.on_change(|_: &ChangeEvent| Err(ChartError::Listener("refused".into())));
    let later = Rc::new(Cell::new(0));
    let l = Rc::clone(&later);
    ds.on_change(move |_: &ChangeEvent| {
        l.set(l.get() + 1);
        Ok(())
    });

    let err = ds.add_series(XySeries::new("a")).unwrap_err();
    assert!(matches!(err, ChartError::Listener(_)));
    assert_eq!(later.get(), 0);
    // the mutation itself happened before notification
    assert!(ds.series(0).is_some());
}

#[test]
fn removed_listener_is_not_called() -> Result<()> {
    let mut ds = collection();
    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);
    let id = ds.on_change(move |_: &ChangeEvent| {
        c.set(c.get() + 1);
        Ok(())
    });
    ds.add(0, 7.0, 7.0)?;
    assert!(ds.remove_change_listener(id));
    assert!(!ds.remove_change_listener(id));
    ds.add(0, 8.0, 8.0)?;
    assert_eq!(calls.get(), 1);
    Ok(())
}

#[test]
fn dataset_change_reaches_chart_with_cause_chain() -> Result<()> {
    let data = shared(collection());
    let plot = XyPlot::new(Some(data.clone().into()), ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line());
    let chart = Chart::new(plot);
    let events = recorder(&chart);

    data.update(|d| d.add(0, 3.0, 9.0))?;

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    let e = &events[0];
    assert_eq!(e.kind(), ChangeKind::Chart);
    assert_eq!(e.source(), chart.id());
    let plot_event = e.cause().expect("relayed from the plot");
    assert_eq!(plot_event.kind(), ChangeKind::Plot);
    assert_eq!(plot_event.source(), chart.plot().id());
    let origin = e.origin();
    assert_eq!(origin.kind(), ChangeKind::Series { index: 0 });
    assert_eq!(origin.source(), data.borrow().id());
    Ok(())
}

#[test]
fn owned_children_relay_as_plot_events() -> Result<()> {
    let mut plot = XyPlot::new(None, ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line());
    let events = recorder(&plot);

    plot.domain_axis_mut().set_label("time")?;
    plot.renderer_mut(0).expect("renderer 0").set_series_paint(0, None)?;
    plot.domain_crosshair_mut().set_visible(true)?;

    let origins: Vec<ChangeKind> = events.borrow().iter().map(|e| e.origin().kind()).collect();
    assert_eq!(origins, vec![ChangeKind::Axis, ChangeKind::Renderer, ChangeKind::Crosshair]);
    assert!(events.borrow().iter().all(|e| e.kind() == ChangeKind::Plot));
    Ok(())
}

#[test]
fn unbound_dataset_no_longer_notifies_plot() -> Result<()> {
    let data = shared(collection());
    let mut plot = XyPlot::new(Some(data.clone().into()), ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line());
    let events = recorder(&plot);
    assert_eq!(data.borrow().notifier().listener_count(), 1);

    let old = plot.set_dataset(0, None)?;
    assert!(old.is_some());
    assert_eq!(events.borrow().len(), 1);
    assert_eq!(data.borrow().notifier().listener_count(), 0);

    data.update(|d| d.add(0, 10.0, 1.0))?;
    assert_eq!(events.borrow().len(), 1);
    Ok(())
}

#[test]
fn relay_goes_inert_when_plot_is_dropped() -> Result<()> {
    let data = shared(collection());
    {
        let _plot = XyPlot::new(Some(data.clone().into()), ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line());
        assert_eq!(data.borrow().notifier().listener_count(), 1);
    }
    assert_eq!(data.borrow().notifier().listener_count(), 0);
    data.update(|d| d.add(0, 5.0, 5.0))?;
    Ok(())
}

#[test]
fn one_dataset_shared_by_two_plots_notifies_both() -> Result<()> {
    let data = shared(collection());
    let a = XyPlot::new(Some(data.clone().into()), ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line());
    let b = XyPlot::new(Some(data.clone().into()), ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::scatter());
    let (ea, eb) = (recorder(&a), recorder(&b));
    data.update(|d| d.remove_item(0, 0))?;
    assert_eq!(ea.borrow().len(), 1);
    assert_eq!(eb.borrow().len(), 1);
    Ok(())
}

#[test]
fn listeners_can_read_the_data_that_changed() -> Result<()> {
    let data = shared(collection());
    let chart = Chart::new(XyPlot::new(Some(data.clone().into()), ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line()));
    let mirror = Chart::new(XyPlot::new(Some(data.clone().into()), ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line()));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    chart.on_change(move |_: &ChangeEvent| {
        let upper = mirror.plot().as_xy().and_then(|p| p.data_range(AxisKind::Range)).map(|r| r.upper());
        let info = mirror.draw(&mut RecordingCanvas::new(), Rect::from_ltwh(0.0, 0.0, 320.0, 240.0));
        sink.borrow_mut().push((upper, info.entities.len()));
        Ok(())
    });

    data.update(|d| d.add(0, 3.0, 9.0))?;
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, Some(9.0));
    assert!(seen[0].1 > 0);
    Ok(())
}

#[test]
fn nested_update_is_refused() -> Result<()> {
    let data = shared(collection());
    let events = recorder(&*data.borrow());
    let nested = data.update(|d| {
        d.add(0, 3.0, 9.0)?;
        data.update(|inner| inner.add(0, 4.0, 16.0))
    });
    assert!(matches!(nested, Err(ChartError::Busy)));
    // the outer edit is kept and still announced
    assert_eq!(data.borrow().series(0).map(|s| s.len()), Some(3));
    assert_eq!(events.borrow().len(), 1);

    data.update(|d| d.add(0, 5.0, 25.0))?;
    assert_eq!(events.borrow().len(), 2);
    Ok(())
}

#[test]
fn update_returns_the_listener_error_after_editing() {
    let data = shared(collection());
    let plot = XyPlot::new(Some(data.clone().into()), ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line());
    plot.on_change(|_: &ChangeEvent| Err(ChartError::Listener("refused".into())));

    let err = data.update(|d| d.add(0, 3.0, 9.0)).unwrap_err();
    assert!(matches!(err, ChartError::Listener(_)));
    assert_eq!(data.borrow().series(0).map(|s| s.len()), Some(3));
}

#[test]
fn replaced_plot_no_longer_reaches_the_chart() -> Result<()> {
    let mut chart = Chart::new(XyPlot::new(None, ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line()));
    let events = recorder(&chart);

    let mut old = chart.set_plot(XyPlot::new(None, ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::scatter()))?;
    assert_eq!(events.borrow().len(), 1);
    assert_eq!(old.notifier().listener_count(), 0);
    old.as_xy_mut().expect("xy plot").set_gridlines_visible(false, false)?;
    assert_eq!(events.borrow().len(), 1);

    chart.plot_mut().as_xy_mut().expect("xy plot").set_gridlines_visible(false, false)?;
    assert_eq!(events.borrow().len(), 2);
    Ok(())
}

#[test]
fn removed_annotation_no_longer_reaches_the_plot() -> Result<()> {
    let mut plot = XyPlot::new(None, ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line());
    plot.add_annotation(XyAnnotation::text("peak", (2.0, 4.0)))?;
    plot.add_annotation(XyAnnotation::text("dip", (1.0, 1.0)))?;
    let events = recorder(&plot);

    let mut removed = plot.remove_annotation(0)?;
    assert_eq!(events.borrow().len(), 1);
    removed.set_tooltip(Some("gone".into()))?;
    assert_eq!(events.borrow().len(), 1);

    plot.annotation_mut(0).expect("annotation").set_tooltip(Some("kept".into()))?;
    assert_eq!(events.borrow().len(), 2);
    assert_eq!(events.borrow()[1].origin().kind(), ChangeKind::Annotation);
    Ok(())
}
